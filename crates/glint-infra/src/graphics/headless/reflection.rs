// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Vertex input reflection over GLSL source text.

use glint_core::renderer::api::{ActiveAttribute, AttributeType};
use std::collections::BTreeSet;

/// GL type code of a GLSL vertex input type name.
pub fn glsl_type_code(name: &str) -> Option<u32> {
    let code = match name {
        "float" => 0x1406,
        "vec2" => 0x8B50,
        "vec3" => 0x8B51,
        "vec4" => 0x8B52,
        "int" => 0x1404,
        "ivec2" => 0x8B53,
        "ivec3" => 0x8B54,
        "ivec4" => 0x8B55,
        "uint" => 0x1405,
        "uvec2" => 0x8DC6,
        "uvec3" => 0x8DC7,
        "uvec4" => 0x8DC8,
        "bool" => 0x8B56,
        "bvec2" => 0x8B57,
        "bvec3" => 0x8B58,
        "bvec4" => 0x8B59,
        "mat2" | "mat2x2" => 0x8B5A,
        "mat3" | "mat3x3" => 0x8B5B,
        "mat4" | "mat4x4" => 0x8B5C,
        "mat2x3" => 0x8B65,
        "mat2x4" => 0x8B66,
        "mat3x2" => 0x8B67,
        "mat3x4" => 0x8B68,
        "mat4x2" => 0x8B69,
        "mat4x3" => 0x8B6A,
        "double" => 0x140A,
        "dvec2" => 0x8FFC,
        "dvec3" => 0x8FFD,
        "dvec4" => 0x8FFE,
        "dmat2" | "dmat2x2" => 0x8F46,
        "dmat3" | "dmat3x3" => 0x8F47,
        "dmat4" | "dmat4x4" => 0x8F48,
        "dmat2x3" => 0x8F49,
        "dmat2x4" => 0x8F4A,
        "dmat3x2" => 0x8F4B,
        "dmat3x4" => 0x8F4C,
        "dmat4x2" => 0x8F4D,
        "dmat4x3" => 0x8F4E,
        _ => return None,
    };
    Some(code)
}

struct Declared {
    name: String,
    gl_type: u32,
    size: u32,
    explicit: Option<u32>,
}

/// Finds the `in` declarations of a vertex shader and reports them the way a driver does
/// after linking.
///
/// Explicit `layout(location = N)` qualifiers are honored; other inputs take the lowest
/// free locations in declaration order. Arrays are reported as `name[0]`. A use of
/// `gl_VertexID` is reported as a built-in without location.
pub fn reflect_inputs(source: &str) -> Vec<ActiveAttribute> {
    let declared: Vec<Declared> = source
        .split(';')
        .filter_map(parse_declaration)
        .collect();

    let mut used = BTreeSet::new();
    for input in &declared {
        if let Some(location) = input.explicit {
            used.extend(location..location + locations_of(input));
        }
    }

    let mut next = 0u32;
    let mut active = Vec::with_capacity(declared.len() + 1);
    for input in declared {
        let span = locations_of(&input);
        let location = match input.explicit {
            Some(location) => location,
            None => {
                while (next..next + span).any(|l| used.contains(&l)) {
                    next += 1;
                }
                used.extend(next..next + span);
                next
            }
        };

        let name = if input.size > 1 {
            format!("{}[0]", input.name)
        } else {
            input.name
        };
        active.push(ActiveAttribute {
            name,
            location: Some(location),
            gl_type: input.gl_type,
            size: input.size,
        });
    }

    if source.contains("gl_VertexID") {
        active.push(ActiveAttribute {
            name: "gl_VertexID".to_owned(),
            location: None,
            gl_type: 0x1404,
            size: 1,
        });
    }

    active
}

fn locations_of(input: &Declared) -> u32 {
    AttributeType::from_gl_type(input.gl_type).map_or(1, |ty| ty.rows) * input.size
}

fn parse_declaration(statement: &str) -> Option<Declared> {
    // Drop line comments and preprocessor lines.
    let statement: String = statement
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    let statement = statement.trim();

    let (explicit, rest) = match statement.strip_prefix("layout") {
        Some(rest) => {
            let rest = rest.trim_start().strip_prefix('(')?;
            let (qualifiers, rest) = rest.split_once(')')?;
            (explicit_location(qualifiers), rest)
        }
        None => (None, statement),
    };

    let mut tokens = rest.split_whitespace();
    let mut token = tokens.next()?;
    while matches!(token, "flat" | "smooth" | "noperspective" | "highp" | "mediump" | "lowp") {
        token = tokens.next()?;
    }
    if token != "in" {
        return None;
    }

    let gl_type = glsl_type_code(tokens.next()?)?;
    let declarator: String = tokens.collect();
    let (name, size) = match declarator.split_once('[') {
        Some((name, length)) => (name, length.trim_end_matches(']').trim().parse().ok()?),
        None => (declarator.as_str(), 1),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some(Declared {
        name: name.to_owned(),
        gl_type,
        size,
        explicit,
    })
}

fn explicit_location(qualifiers: &str) -> Option<u32> {
    qualifiers.split(',').find_map(|qualifier| {
        let (key, value) = qualifier.split_once('=')?;
        (key.trim() == "location").then(|| value.trim().parse().ok())?
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "
        #version 330 core
        in vec3 in_vert; // position
        in vec2 in_uv;
        layout (location = 0) in mat4 in_model;
        in float in_weights[2];
        uniform mat4 mvp;
        out vec2 v_uv;
        void main() { v_uv = in_uv; gl_Position = mvp * vec4(in_vert, float(gl_VertexID)); }
    ";

    #[test]
    fn test_reflection_reads_inputs_in_declaration_order() {
        // ACT
        let inputs = reflect_inputs(VERTEX);

        // ASSERT
        let names: Vec<&str> = inputs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            ["in_vert", "in_uv", "in_model", "in_weights[0]", "gl_VertexID"]
        );
    }

    #[test]
    fn test_reflection_places_implicit_inputs_after_explicit_ones() {
        // ACT
        let inputs = reflect_inputs(VERTEX);

        // ASSERT
        // The matrix holds locations 0..4, so the others start at 4.
        assert_eq!(inputs[2].location, Some(0));
        assert_eq!(inputs[0].location, Some(4));
        assert_eq!(inputs[1].location, Some(5));
        assert_eq!(inputs[3].location, Some(6));
        assert_eq!(inputs[3].size, 2);
        assert_eq!(inputs[4].location, None);
    }

    #[test]
    fn test_reflection_ignores_outputs_and_uniforms() {
        let inputs = reflect_inputs("uniform vec4 color; out vec4 frag; in ivec2 in_cell;");
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].gl_type, 0x8B53);
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        assert!(reflect_inputs("in sampler2D tex;").is_empty());
        assert_eq!(glsl_type_code("dmat3x4"), Some(0x8F4C));
    }
}
