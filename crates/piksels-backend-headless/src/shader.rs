//! Shader interface discovery.
//!
//! The headless backend does not run shaders. It only reads the `uniform`
//! declarations of every stage, so that uniforms and binding points can be
//! checked the way a driver would:
//!
//! ```glsl
//! uniform float time;
//! uniform vec4 colors[3];
//! uniform sampler2D albedo;
//! layout(std140) uniform Matrices {
//! ```
//!
//! Samplers become texture binding points and blocks become uniform buffer
//! binding points.

use std::collections::{HashMap, HashSet};

use piksels_backend::shader::{ShaderSources, UniformType, UniformTypeBase};

use crate::error::HeadlessError;

/// Everything a shader declares.
#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct Declarations {
    uniforms: HashMap<String, UniformType>,
    samplers: HashSet<String>,
    blocks: HashSet<String>,
}

enum Declared {
    Uniform(UniformType),
    Sampler,
}

impl Declarations {
    /// Collects the declarations of every stage.
    ///
    /// ## Errors
    ///
    /// [`HeadlessError::ShaderCompilation`] if the vertex or fragment stage is
    /// missing, a declaration cannot be read, or two stages declare the same
    /// name differently.
    pub fn parse(sources: &ShaderSources) -> Result<Self, HeadlessError> {
        if sources.vertex_stage().trim().is_empty() {
            return Err(compilation("missing vertex stage"));
        }

        if sources.fragment_stage().trim().is_empty() {
            return Err(compilation("missing fragment stage"));
        }

        let mut declarations = Self::default();

        for line in sources.stages().flat_map(str::lines) {
            if let Some(declaration) = uniform_declaration(line) {
                declarations.declare(declaration)?;
            }
        }

        Ok(declarations)
    }

    fn declare(&mut self, declaration: &str) -> Result<(), HeadlessError> {
        if let Some(block) = declaration.strip_suffix('{') {
            let name = identifier(block.trim())?;
            self.blocks.insert(name.to_owned());
            return Ok(());
        }

        let declaration = declaration
            .strip_suffix(';')
            .ok_or_else(|| compilation(format!("expected `;` after `{declaration}`")))?;

        // precision qualifiers may come first
        let mut tokens = declaration.split_whitespace().rev();
        let (Some(name), Some(ty)) = (tokens.next(), tokens.next()) else {
            return Err(compilation(format!("malformed uniform `{declaration}`")));
        };
        let (name, array) = array_suffix(name)?;
        let name = identifier(name)?;

        match (glsl_type(ty), array) {
            (Some(Declared::Sampler), _) => {
                self.samplers.insert(name.to_owned());
            }

            (Some(Declared::Uniform(ty)), array) => {
                let ty = match array {
                    Some(len) => ty.array(len),
                    None => ty,
                };

                match self.uniforms.insert(name.to_owned(), ty) {
                    Some(previous) if previous != ty => {
                        return Err(compilation(format!(
                            "`{name}` declared as both {previous} and {ty}"
                        )));
                    }
                    _ => {}
                }
            }

            (None, _) => return Err(compilation(format!("unknown uniform type `{ty}`"))),
        }

        Ok(())
    }

    /// Checks that `name` is declared with type `ty`.
    pub fn uniform(&self, name: &str, ty: UniformType) -> Result<(), HeadlessError> {
        let declared = *self.uniforms.get(name).ok_or_else(|| unknown(name))?;

        if declared == ty {
            Ok(())
        } else {
            Err(HeadlessError::UniformTypeMismatch {
                name: name.to_owned(),
                declared,
                requested: ty,
            })
        }
    }

    pub fn sampler(&self, name: &str) -> Result<(), HeadlessError> {
        self.samplers
            .contains(name)
            .then_some(())
            .ok_or_else(|| unknown(name))
    }

    pub fn block(&self, name: &str) -> Result<(), HeadlessError> {
        self.blocks
            .contains(name)
            .then_some(())
            .ok_or_else(|| unknown(name))
    }
}

fn compilation(reason: impl Into<String>) -> HeadlessError {
    HeadlessError::ShaderCompilation {
        reason: reason.into(),
    }
}

fn unknown(name: &str) -> HeadlessError {
    HeadlessError::UnknownUniform {
        name: name.to_owned(),
    }
}

/// What follows the `uniform` keyword, if the line declares a uniform.
fn uniform_declaration(line: &str) -> Option<&str> {
    let mut line = line.trim();

    if let Some(rest) = line.strip_prefix("layout") {
        let (_, rest) = rest.split_once(')')?;
        line = rest.trim_start();
    }

    let rest = line.strip_prefix("uniform")?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn identifier(name: &str) -> Result<&str, HeadlessError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(compilation(format!("invalid identifier `{name}`")))
    }
}

/// Splits `name[N]` into `name` and `N`.
fn array_suffix(name: &str) -> Result<(&str, Option<usize>), HeadlessError> {
    let Some((name, len)) = name.split_once('[') else {
        return Ok((name, None));
    };

    len.strip_suffix(']')
        .and_then(|len| len.trim().parse().ok())
        .map(|len| (name, Some(len)))
        .ok_or_else(|| compilation(format!("invalid array length in `{name}[{len}`")))
}

fn glsl_type(ty: &str) -> Option<Declared> {
    use UniformTypeBase::*;

    if ty.starts_with("sampler") || ty.starts_with("isampler") || ty.starts_with("usampler") {
        return Some(Declared::Sampler);
    }

    let base = match ty {
        "int" => Int,
        "ivec2" => Int2,
        "ivec3" => Int3,
        "ivec4" => Int4,
        "uint" => Uint,
        "uvec2" => Uint2,
        "uvec3" => Uint3,
        "uvec4" => Uint4,
        "bool" => Bool,
        "bvec2" => Bool2,
        "bvec3" => Bool3,
        "bvec4" => Bool4,
        "float" => Float,
        "vec2" => Float2,
        "vec3" => Float3,
        "vec4" => Float4,
        "double" => Double,
        "dvec2" => Double2,
        "dvec3" => Double3,
        "dvec4" => Double4,
        "mat2" | "mat2x2" => FloatMat22,
        "mat2x3" => FloatMat23,
        "mat2x4" => FloatMat24,
        "mat3x2" => FloatMat32,
        "mat3" | "mat3x3" => FloatMat33,
        "mat3x4" => FloatMat34,
        "mat4x2" => FloatMat42,
        "mat4x3" => FloatMat43,
        "mat4" | "mat4x4" => FloatMat44,
        "dmat2" | "dmat2x2" => DoubleMat22,
        "dmat2x3" => DoubleMat23,
        "dmat2x4" => DoubleMat24,
        "dmat3x2" => DoubleMat32,
        "dmat3" | "dmat3x3" => DoubleMat33,
        "dmat3x4" => DoubleMat34,
        "dmat4x2" => DoubleMat42,
        "dmat4x3" => DoubleMat43,
        "dmat4" | "dmat4x4" => DoubleMat44,
        _ => return None,
    };

    Some(Declared::Uniform(base.into()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VS: &str = "
        #version 330 core
        uniform mat4 projection;
        uniform highp float time;
        in vec2 position;
        void main() {}
    ";

    const FS: &str = "
        uniform float time;
        uniform vec4 palette[3];
        uniform sampler2D albedo;
        layout(std140) uniform Lights {
            vec4 ambient;
        };
        out vec4 color;
    ";

    #[test]
    fn collects_declarations() {
        let declarations =
            Declarations::parse(&ShaderSources::default().vertex(VS).fragment(FS)).unwrap();

        declarations
            .uniform("projection", UniformTypeBase::FloatMat44.into())
            .unwrap();
        declarations
            .uniform("time", UniformTypeBase::Float.into())
            .unwrap();
        declarations
            .uniform("palette", UniformType::new(UniformTypeBase::Float4, 3))
            .unwrap();
        declarations.sampler("albedo").unwrap();
        declarations.block("Lights").unwrap();

        assert_eq!(
            declarations.uniform("time", UniformTypeBase::Double.into()),
            Err(HeadlessError::UniformTypeMismatch {
                name: "time".to_owned(),
                declared: UniformTypeBase::Float.into(),
                requested: UniformTypeBase::Double.into(),
            })
        );
        assert_eq!(
            declarations.uniform("albedo", UniformTypeBase::Int.into()),
            Err(HeadlessError::UnknownUniform {
                name: "albedo".to_owned()
            })
        );
        assert!(declarations.sampler("Lights").is_err());
    }

    #[test]
    fn missing_stages() {
        assert!(matches!(
            Declarations::parse(&ShaderSources::default().vertex(VS)),
            Err(HeadlessError::ShaderCompilation { .. })
        ));
        assert!(matches!(
            Declarations::parse(&ShaderSources::default().fragment(FS)),
            Err(HeadlessError::ShaderCompilation { .. })
        ));
    }

    #[test]
    fn malformed_declarations() {
        let parse = |fs: &str| Declarations::parse(&ShaderSources::default().vertex(VS).fragment(fs));

        assert!(parse("uniform vec5 nope;").is_err());
        assert!(parse("uniform float a").is_err());
        assert!(parse("uniform float a[x];").is_err());
        assert!(parse("uniform int time;").is_err());
        assert!(parse("uniforms are not declared here").is_ok());
    }
}
