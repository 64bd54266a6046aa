use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::GodraysError;

/// Shared modules, registered in dependency order: (source, file_path).
const MODULES: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        "modules/fullscreen.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/depth.wgsl"),
        "modules/depth.wgsl",
    ),
];

/// Entry-point shaders, looked up by the path passed to
/// [`ShaderComposer::compose`].
const SHADERS: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/screen/godrays_depth_mask.wgsl"),
        "screen/godrays_depth_mask.wgsl",
    ),
    (
        include_str!("../../assets/shaders/screen/godrays_generate.wgsl"),
        "screen/godrays_generate.wgsl",
    ),
    (
        include_str!("../../assets/shaders/screen/godrays_combine.wgsl"),
        "screen/godrays_combine.wgsl",
    ),
    (
        include_str!("../../assets/shaders/screen/godrays_fake_sun.wgsl"),
        "screen/godrays_fake_sun.wgsl",
    ),
    (
        include_str!("../../assets/shaders/raster/solid.wgsl"),
        "raster/solid.wgsl",
    ),
];

/// Embedded WGSL source for a registered shader path.
#[must_use]
pub fn shader_source(file_path: &str) -> Option<&'static str> {
    SHADERS
        .iter()
        .find(|(_, path)| *path == file_path)
        .map(|(source, _)| *source)
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import godrays::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, GodraysError> {
        let mut composer = Composer::default();

        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    GodraysError::ShaderCompose(format!(
                        "failed to register module '{file_path}': {e}"
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose the registered shader at `file_path` (which may contain
    /// `#import` directives) into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the path is unknown or
    /// composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GodraysError> {
        let source = shader_source(file_path).ok_or_else(|| {
            GodraysError::ShaderCompose(format!(
                "unknown shader '{file_path}'"
            ))
        })?;
        let naga_module =
            self.compose_naga(source, file_path).map_err(|e| {
                GodraysError::ShaderCompose(format!("'{file_path}': {e}"))
            })?;
        log::debug!("composed shader {file_path}");

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns the naga-oil composer error on failure.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for &(source, file_path) in SHADERS {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| {
                    panic!("Shader '{file_path}' failed to compose: {e}")
                });
            assert!(
                !module.entry_points.is_empty(),
                "Shader '{file_path}' has no entry points"
            );
        }
    }

    #[test]
    fn composed_screen_shaders_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for &(source, file_path) in SHADERS {
            let module = composer.compose_naga(source, file_path).unwrap();
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            );
            let _ = validator.validate(&module).unwrap_or_else(|e| {
                panic!("Shader '{file_path}' failed validation: {e:?}")
            });
        }
    }

    #[test]
    fn every_shader_has_both_entry_points() {
        let mut composer = ShaderComposer::new().unwrap();
        for &(source, file_path) in SHADERS {
            let module = composer.compose_naga(source, file_path).unwrap();
            let names: Vec<&str> = module
                .entry_points
                .iter()
                .map(|ep| ep.name.as_str())
                .collect();
            assert!(names.contains(&"vs_main"), "{file_path}: {names:?}");
            assert!(names.contains(&"fs_main"), "{file_path}: {names:?}");
        }
    }

    #[test]
    fn unknown_shader_path_has_no_source() {
        assert!(shader_source("screen/bloom.wgsl").is_none());
        assert!(shader_source("screen/godrays_combine.wgsl").is_some());
    }
}
