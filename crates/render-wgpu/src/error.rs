/// Fatal graphics setup failures. Any of these aborts initialization; no
/// frame is ever rendered with a partially built context.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to create drawing surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no graphics adapter compatible with the surface")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
    #[error("surface does not support {0:?} usage")]
    SurfaceUsage(wgpu::TextureUsages),
    #[error("{slots} uniform slots of {stride} bytes exceed the {limit} byte buffer limit")]
    SlotPoolTooLarge { slots: usize, stride: u64, limit: u64 },
    #[error("shader parse error:\n{0}")]
    ShaderParse(String),
    #[error("shader validation error: {0}")]
    ShaderValidation(String),
    #[error("shader has no {stage:?} entry point named `{name}`")]
    MissingEntryPoint {
        name: &'static str,
        stage: naga::ShaderStage,
    },
    #[error("failed to get the storage location of `{0}`")]
    UnresolvedSymbol(&'static str),
    #[error("`{symbol}` is bound at group {group}, expected group {expected}")]
    UnexpectedGroup {
        symbol: &'static str,
        group: u32,
        expected: u32,
    },
}
