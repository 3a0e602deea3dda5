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

//! Program input reflection: the table mapping attribute names to locations and shapes.

use std::collections::HashMap;

use super::enums::ScalarType;

/// An active vertex input as the driver reports it after linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAttribute {
    /// Name, possibly carrying a `[0]` array suffix.
    pub name: String,
    /// Bound location; `None` for built-in inputs such as `gl_VertexID`.
    pub location: Option<u32>,
    /// Raw GL type code of the input.
    pub gl_type: u32,
    /// Array length (1 for non-arrays).
    pub size: u32,
}

/// The shape of one element of a GLSL input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeType {
    /// Scalars per element.
    pub dimension: u32,
    /// Locations per element (matrix columns, 1 otherwise).
    pub rows: u32,
    /// Scalars per location.
    pub row_length: u32,
    /// Shape code matching the format mini-language: `'f'`, `'i'`, `'u'` or `'d'`.
    pub shape: char,
    /// Scalar type of the input.
    pub scalar: ScalarType,
    /// Input is float-typed and can be fed normalized integers.
    pub normalizable: bool,
}

impl AttributeType {
    const fn new(shape: char, scalar: ScalarType, rows: u32, row_length: u32) -> Self {
        Self {
            dimension: rows * row_length,
            rows,
            row_length,
            shape,
            scalar,
            normalizable: matches!(shape, 'f'),
        }
    }

    /// Decodes a raw GL type code, `None` for types that cannot be vertex inputs.
    pub fn from_gl_type(gl_type: u32) -> Option<Self> {
        use ScalarType::{F32, F64, I32, U32};

        let ty = match gl_type {
            0x1406 => Self::new('f', F32, 1, 1),
            0x8B50 => Self::new('f', F32, 1, 2),
            0x8B51 => Self::new('f', F32, 1, 3),
            0x8B52 => Self::new('f', F32, 1, 4),
            0x8B5A => Self::new('f', F32, 2, 2),
            0x8B65 => Self::new('f', F32, 2, 3),
            0x8B66 => Self::new('f', F32, 2, 4),
            0x8B67 => Self::new('f', F32, 3, 2),
            0x8B5B => Self::new('f', F32, 3, 3),
            0x8B68 => Self::new('f', F32, 3, 4),
            0x8B69 => Self::new('f', F32, 4, 2),
            0x8B6A => Self::new('f', F32, 4, 3),
            0x8B5C => Self::new('f', F32, 4, 4),

            // Booleans are fed as signed integers.
            0x1404 | 0x8B56 => Self::new('i', I32, 1, 1),
            0x8B53 | 0x8B57 => Self::new('i', I32, 1, 2),
            0x8B54 | 0x8B58 => Self::new('i', I32, 1, 3),
            0x8B55 | 0x8B59 => Self::new('i', I32, 1, 4),

            0x1405 => Self::new('u', U32, 1, 1),
            0x8DC6 => Self::new('u', U32, 1, 2),
            0x8DC7 => Self::new('u', U32, 1, 3),
            0x8DC8 => Self::new('u', U32, 1, 4),

            0x140A => Self::new('d', F64, 1, 1),
            0x8FFC => Self::new('d', F64, 1, 2),
            0x8FFD => Self::new('d', F64, 1, 3),
            0x8FFE => Self::new('d', F64, 1, 4),
            0x8F46 => Self::new('d', F64, 2, 2),
            0x8F49 => Self::new('d', F64, 2, 3),
            0x8F4A => Self::new('d', F64, 2, 4),
            0x8F4B => Self::new('d', F64, 3, 2),
            0x8F47 => Self::new('d', F64, 3, 3),
            0x8F4C => Self::new('d', F64, 3, 4),
            0x8F4D => Self::new('d', F64, 4, 2),
            0x8F4E => Self::new('d', F64, 4, 3),
            0x8F48 => Self::new('d', F64, 4, 4),
            _ => return None,
        };
        Some(ty)
    }
}

/// A program vertex input, ready for binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Name without array suffix.
    pub name: String,
    /// First location; matrices and arrays occupy `rows_length` consecutive ones.
    pub location: u32,
    /// Raw GL type code.
    pub gl_type: u32,
    /// Array length (1 for non-arrays).
    pub array_length: u32,
    /// Decoded element type.
    pub ty: AttributeType,
    /// Total locations occupied: element rows × array length.
    pub rows_length: u32,
    /// Byte size of one location's data when stored as the input type.
    pub row_size: usize,
}

impl Attribute {
    /// Scalars consumed from a vertex: dimension × array length.
    pub fn scalars(&self) -> usize {
        (self.ty.dimension * self.array_length) as usize
    }

    /// Shape code of the input.
    pub fn shape(&self) -> char {
        self.ty.shape
    }
}

/// Per-program name → [`Attribute`] lookup, built once after linking.
#[derive(Debug, Clone, Default)]
pub struct AttributeTable {
    attributes: HashMap<String, Attribute>,
}

impl AttributeTable {
    /// Builds the table from driver reflection. Built-ins and unknown types are skipped.
    pub fn from_active(active: impl IntoIterator<Item = ActiveAttribute>) -> Self {
        let mut attributes = HashMap::new();

        for input in active {
            let Some(location) = input.location else {
                continue;
            };
            let Some(ty) = AttributeType::from_gl_type(input.gl_type) else {
                log::warn!(
                    "Skipping attribute '{}' with unsupported type 0x{:04X}",
                    input.name,
                    input.gl_type
                );
                continue;
            };

            let name = input
                .name
                .strip_suffix("[0]")
                .unwrap_or(&input.name)
                .to_owned();
            let array_length = input.size.max(1);

            let attribute = Attribute {
                name: name.clone(),
                location,
                gl_type: input.gl_type,
                array_length,
                ty,
                rows_length: ty.rows * array_length,
                row_size: ty.row_length as usize * ty.scalar.size(),
            };
            attributes.insert(name, attribute);
        }

        Self { attributes }
    }

    /// Looks up an input by name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterates over all inputs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the program has no reflectable inputs.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(name: &str, location: u32, gl_type: u32, size: u32) -> ActiveAttribute {
        ActiveAttribute {
            name: name.to_owned(),
            location: Some(location),
            gl_type,
            size,
        }
    }

    #[test]
    fn decodes_vectors() {
        let vec3 = AttributeType::from_gl_type(0x8B51).unwrap();
        assert_eq!(vec3.dimension, 3);
        assert_eq!(vec3.rows, 1);
        assert_eq!(vec3.shape, 'f');
        assert!(vec3.normalizable);

        let ivec2 = AttributeType::from_gl_type(0x8B53).unwrap();
        assert_eq!(ivec2.shape, 'i');
        assert!(!ivec2.normalizable);

        assert!(AttributeType::from_gl_type(0x8B5E).is_none());
    }

    #[test]
    fn matrices_span_one_location_per_column() {
        let table = AttributeTable::from_active([active("model", 2, 0x8B5C, 1)]);
        let model = table.get("model").unwrap();
        assert_eq!(model.scalars(), 16);
        assert_eq!(model.rows_length, 4);
        assert_eq!(model.ty.row_length, 4);
        assert_eq!(model.row_size, 16);

        let mat2x3 = AttributeType::from_gl_type(0x8B65).unwrap();
        assert_eq!((mat2x3.rows, mat2x3.row_length, mat2x3.dimension), (2, 3, 6));
    }

    #[test]
    fn arrays_strip_their_suffix() {
        let table = AttributeTable::from_active([active("weights[0]", 0, 0x1406, 4)]);
        let weights = table.get("weights").unwrap();
        assert_eq!(weights.array_length, 4);
        assert_eq!(weights.scalars(), 4);
        assert_eq!(weights.rows_length, 4);
        assert!(table.get("weights[0]").is_none());
    }

    #[test]
    fn built_ins_are_skipped() {
        let table = AttributeTable::from_active([
            ActiveAttribute {
                name: "gl_VertexID".to_owned(),
                location: None,
                gl_type: 0x1404,
                size: 1,
            },
            active("in_pos", 0, 0x8B50, 1),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("in_pos").unwrap().row_size, 8);
    }

    #[test]
    fn doubles_use_eight_byte_rows() {
        let table = AttributeTable::from_active([active("precise", 1, 0x8FFD, 1)]);
        let precise = table.get("precise").unwrap();
        assert_eq!(precise.shape(), 'd');
        assert_eq!(precise.row_size, 24);
    }
}
