//! Options methods for GodraysEngine

use super::GodraysEngine;
use crate::effect::params::GodraysParams;
use crate::options::Options;
use crate::scene::Scene;

impl GodraysEngine {
    /// Replace options and apply all changes to subsystems.
    pub fn set_options(&mut self, new: Options) {
        let old = std::mem::replace(&mut self.options, new);
        self.apply_godrays();
        self.camera_controller.apply_options(&self.options.camera);
        if old.scene != self.options.scene {
            self.rebuild_scene();
        }
        if old.display != self.options.display {
            self.apply_display();
        }
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Push effect options to the god-ray passes.
    pub(super) fn apply_godrays(&mut self) {
        let go = &self.options.godrays;
        let queue = &self.context.queue;
        self.effect.set_params(queue, GodraysParams::from_options(go));
        self.effect.set_enabled(queue, go.enabled);
        self.effect.set_show_fake_sun(go.show_fake_sun);
    }

    /// Recreate the scene layout, keeping the animation clock.
    fn rebuild_scene(&mut self) {
        let elapsed = self.scene.time();
        self.scene = Scene::from_options(&self.options.scene);
        self.scene.update(elapsed);
        self.solid.rebuild(&self.context, &self.scene);
    }

    /// Push presentation options to the context.
    fn apply_display(&mut self) {
        let display = &self.options.display;
        self.context.set_vsync(display.vsync);
        let scale = display.render_scale.max(1);
        if scale != self.context.render_scale {
            self.context.render_scale = scale;
            self.recreate_targets();
        }
    }
}
