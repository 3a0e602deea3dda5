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

//! Wiring vertex buffers to program inputs.

use super::scope::BindScope;
use super::Context;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;

/// One step of a validated layout: skip padding, or feed an input.
enum LayoutSlot<'p> {
    Padding(usize),
    Input {
        node: FormatNode,
        attribute: &'p Attribute,
    },
}

/// A binding that passed validation, ready to be applied.
struct ResolvedBinding<'p> {
    buffer: Handle,
    info: FormatInfo,
    slots: Vec<LayoutSlot<'p>>,
}

impl Context {
    /// Creates a vertex array feeding `program` from `content`.
    ///
    /// Every binding is validated against the program's attribute table before the
    /// driver object is created. The first binding must step per vertex.
    pub fn vertex_array(
        &self,
        program: &Program,
        content: &[VertexBufferBinding<'_>],
        index_buffer: Option<&Buffer>,
    ) -> Result<VertexArray, ResourceError> {
        self.ensure_owned(program.context, || "the program".to_owned())?;
        if let Some(index_buffer) = index_buffer {
            self.ensure_owned(index_buffer.context, || "the index_buffer".to_owned())?;
        }
        if content.is_empty() {
            return Err(ResourceError::EmptyContent(
                "the content must not be empty".to_owned(),
            ));
        }

        let program_handle = program.handle()?;
        let index_handle = index_buffer.map(Buffer::handle).transpose()?;

        let resolved = content
            .iter()
            .enumerate()
            .map(|(i, binding)| self.resolve_binding(i, binding, program.attributes()))
            .collect::<Result<Vec<_>, _>>()?;

        let vertices = vertex_count(content, &resolved, index_buffer);

        let handle = self
            .driver
            .create_vertex_array()
            .ok_or(ResourceError::AllocationFailed {
                kind: VertexArray::KIND,
            })?;

        {
            let mut scope = BindScope::new(self.driver());
            scope
                .bind(BindingPoint::VertexArray, Some(handle))
                .bind(BindingPoint::Program, Some(program_handle))
                .save(BindingPoint::ArrayBuffer);

            if let Some(index_handle) = index_handle {
                self.driver
                    .bind_buffer(BufferTarget::ElementArray, Some(index_handle));
            }

            for binding in &resolved {
                self.apply_binding(binding);
            }
        }

        self.poll_errors(VertexArray::KIND);
        log::debug!(
            "Created vertex array {} ({} bindings, {:?} vertices)",
            handle.get(),
            content.len(),
            vertices
        );

        Ok(VertexArray {
            context: self.id,
            state: ResourceState::Live(handle),
            program: program_handle,
            index_buffer: index_handle,
            vertices,
        })
    }

    fn resolve_binding<'p>(
        &self,
        i: usize,
        binding: &VertexBufferBinding<'_>,
        attributes: &'p AttributeTable,
    ) -> Result<ResolvedBinding<'p>, ResourceError> {
        self.ensure_owned(binding.buffer.context, || format!("content[{i}][0]"))?;

        let format = FormatIterator::new(binding.format);
        let info = format.info();

        if !info.valid {
            return Err(ResourceError::InvalidFormat(format!(
                "content[{i}][1] is an invalid format"
            )));
        }
        if i == 0 && info.divisor != 0 {
            return Err(ResourceError::InvalidFormat(
                "the first vertex attribute must not be a per instance attribute".to_owned(),
            ));
        }
        if binding.attributes.is_empty() {
            return Err(ResourceError::EmptyContent(format!(
                "content[{i}][2] must not be empty"
            )));
        }
        if binding.attributes.len() != info.nodes {
            return Err(ResourceError::AttributeMismatch(format!(
                "content[{i}][1] and content[{i}][2] size mismatch {} != {}",
                info.nodes,
                binding.attributes.len()
            )));
        }

        let mut names = binding.attributes.iter();
        let mut slots = Vec::new();

        for node in format {
            if node.is_padding() {
                slots.push(LayoutSlot::Padding(node.byte_size()));
                continue;
            }

            // The counts were checked above, so there is a name for every node.
            let Some(&name) = names.next() else {
                break;
            };

            let attribute = attributes.get(name).ok_or_else(|| {
                ResourceError::AttributeMismatch(format!("{name} is not a valid attribute"))
            })?;

            if attribute.scalars() != node.count {
                return Err(ResourceError::AttributeMismatch(format!(
                    "{name} size is {} not {}",
                    attribute.scalars(),
                    node.count
                )));
            }
            if attribute.shape() != node.shape {
                return Err(ResourceError::AttributeMismatch(format!(
                    "{name} shape is '{}' not '{}'",
                    attribute.shape(),
                    node.shape
                )));
            }

            slots.push(LayoutSlot::Input { node, attribute });
        }

        Ok(ResolvedBinding {
            buffer: binding.buffer.handle()?,
            info,
            slots,
        })
    }

    fn apply_binding(&self, binding: &ResolvedBinding<'_>) {
        self.driver
            .bind_buffer(BufferTarget::Array, Some(binding.buffer));

        let stride = binding.info.size;
        let mut offset = 0usize;

        for slot in &binding.slots {
            let (node, attribute) = match slot {
                LayoutSlot::Padding(bytes) => {
                    offset += bytes;
                    continue;
                }
                LayoutSlot::Input { node, attribute } => (node, *attribute),
            };

            let kind = match attribute.shape() {
                'd' => AttribPointerKind::Double,
                'i' | 'u' => AttribPointerKind::Integer,
                _ => AttribPointerKind::Float {
                    normalized: node.normalized && attribute.ty.normalizable,
                },
            };
            let scalar = node.scalar.unwrap_or(attribute.ty.scalar);
            let row_bytes = attribute.ty.row_length as usize * node.size;

            for row in 0..attribute.rows_length {
                let location = attribute.location + row;
                self.driver.vertex_attrib_pointer(&AttribPointer {
                    location,
                    components: attribute.ty.row_length,
                    scalar,
                    kind,
                    stride,
                    offset,
                });
                self.driver
                    .vertex_attrib_divisor(location, binding.info.divisor);
                self.driver.enable_vertex_attrib_array(location);
                offset += row_bytes;
            }
        }
    }
}

/// Vertices drawable: from the index buffer if present, otherwise the smallest
/// per-vertex binding. Per-instance bindings never constrain the count.
fn vertex_count(
    content: &[VertexBufferBinding<'_>],
    resolved: &[ResolvedBinding<'_>],
    index_buffer: Option<&Buffer>,
) -> Option<usize> {
    if let Some(index_buffer) = index_buffer {
        return Some(index_buffer.size() / 4);
    }

    content
        .iter()
        .zip(resolved)
        .filter(|(_, binding)| binding.info.divisor == 0)
        .map(|(binding, resolved)| binding.buffer.size() / resolved.info.size)
        .min()
}
