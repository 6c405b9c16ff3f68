use crate::error::SetupError;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const GLOBAL_ROTATE_MATRIX: &str = "u_global_rotate_matrix";
pub const MODEL_MATRIX: &str = "u_model_matrix";
pub const FRAG_COLOR: &str = "u_frag_color";

/// Bind group holding the per-frame global rotation.
pub const FRAME_GROUP: u32 = 0;
/// Bind group holding per-cube uniforms, addressed by dynamic offset.
pub const OBJECT_GROUP: u32 = 1;

/// WGSL program for flat-colored cubes.
///
/// `clip = global * model * position`. Both stages share the symbol contract
/// above; rename them only in lockstep with the constants.
pub const CUBE_SHADER: &str = r#"
@group(0) @binding(0)
var<uniform> u_global_rotate_matrix: mat4x4<f32>;

@group(1) @binding(0)
var<uniform> u_model_matrix: mat4x4<f32>;

@group(1) @binding(1)
var<uniform> u_frag_color: vec4<f32>;

@vertex
fn vs_main(@location(0) a_position: vec3<f32>) -> @builtin(position) vec4<f32> {
    var clip = u_global_rotate_matrix * u_model_matrix * vec4<f32>(a_position, 1.0);
    // Scene coordinates use a [-1, 1] depth range; wgpu clips to [0, 1].
    clip.z = clip.z * 0.5 + clip.w * 0.5;
    return clip;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u_frag_color;
}
"#;

/// Group and binding of a resolved uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub group: u32,
    pub binding: u32,
}

/// Resolved handles of the four shader symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderInterface {
    pub position_location: u32,
    pub global_rotate_matrix: UniformSlot,
    pub model_matrix: UniformSlot,
    pub frag_color: UniformSlot,
}

/// Parse and validate `source`, then resolve the attribute and uniform
/// symbols the cube renderer binds.
pub fn resolve_interface(source: &str) -> Result<ShaderInterface, SetupError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| SetupError::ShaderParse(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| SetupError::ShaderValidation(e.to_string()))?;

    let vertex = entry_point(&module, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    entry_point(&module, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    let position_location = vertex
        .function
        .arguments
        .iter()
        .find(|arg| arg.name.as_deref() == Some(POSITION_ATTRIBUTE))
        .and_then(|arg| match arg.binding {
            Some(naga::Binding::Location { location, .. }) => Some(location),
            _ => None,
        })
        .ok_or(SetupError::UnresolvedSymbol(POSITION_ATTRIBUTE))?;

    let interface = ShaderInterface {
        position_location,
        global_rotate_matrix: uniform(&module, GLOBAL_ROTATE_MATRIX)?,
        model_matrix: uniform(&module, MODEL_MATRIX)?,
        frag_color: uniform(&module, FRAG_COLOR)?,
    };

    expect_group(GLOBAL_ROTATE_MATRIX, interface.global_rotate_matrix, FRAME_GROUP)?;
    expect_group(MODEL_MATRIX, interface.model_matrix, OBJECT_GROUP)?;
    expect_group(FRAG_COLOR, interface.frag_color, OBJECT_GROUP)?;

    Ok(interface)
}

fn entry_point<'m>(
    module: &'m naga::Module,
    name: &'static str,
    stage: naga::ShaderStage,
) -> Result<&'m naga::EntryPoint, SetupError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or(SetupError::MissingEntryPoint { name, stage })
}

fn uniform(module: &naga::Module, name: &'static str) -> Result<UniformSlot, SetupError> {
    module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some(name) && var.space == naga::AddressSpace::Uniform)
        .and_then(|(_, var)| var.binding.as_ref())
        .map(|b| UniformSlot {
            group: b.group,
            binding: b.binding,
        })
        .ok_or(SetupError::UnresolvedSymbol(name))
}

fn expect_group(symbol: &'static str, slot: UniformSlot, expected: u32) -> Result<(), SetupError> {
    if slot.group == expected {
        Ok(())
    } else {
        Err(SetupError::UnexpectedGroup {
            symbol,
            group: slot.group,
            expected,
        })
    }
}
