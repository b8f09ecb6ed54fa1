use crate::viewer::ViewerSession;

impl ViewerSession {
    /// Turns the active model by `-rotate_step` around Y. No-op without an active model.
    pub fn rotate_left(&mut self) -> bool {
        let step = self.camera.config().rotate_step;
        self.rotate_active(-step)
    }

    pub fn rotate_right(&mut self) -> bool {
        let step = self.camera.config().rotate_step;
        self.rotate_active(step)
    }

    pub fn zoom_in(&mut self) {
        let step = self.camera.config().zoom_step;
        self.camera.zoom(-step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.camera.config().zoom_step;
        self.camera.zoom(step);
    }

    fn rotate_active(&mut self, yaw_delta: f32) -> bool {
        let Some(handle) = self.state.active_node else {
            return false;
        };
        match self.scene.node_mut(handle) {
            Some(node) => {
                node.transform.rotation.y += yaw_delta;
                true
            }
            None => false,
        }
    }
}
