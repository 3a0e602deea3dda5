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


use anyhow::Result;
use glint_core::renderer::api::*;
use glint_core::{Context, ContextSettings, ErrorKind, ResourceError};
use glint_infra::graphics::headless::ObjectKind;
use glint_infra::HeadlessDriver;

// --- Test Setup ---
fn context() -> Context {
    Context::new(Box::new(HeadlessDriver::new()), ContextSettings::default()).unwrap()
}

fn headless(context: &Context) -> &HeadlessDriver {
    context.driver().as_any().downcast_ref().unwrap()
}
// ---

#[test]
fn test_buffer_from_data_stores_the_bytes() -> Result<()> {
    // ARRANGE
    let context = context();
    let data: Vec<u8> = (0..12).collect();

    // ACT
    let buffer = context.buffer(Some(&data), 0, false)?;

    // ASSERT
    assert_eq!(buffer.size(), 12);
    assert!(!buffer.is_dynamic());
    assert_eq!(headless(&context).buffer_contents(buffer.handle()?), Some(data));
    assert_eq!(
        context.driver().current_binding(BindingPoint::ArrayBuffer),
        None,
        "the array buffer binding is restored"
    );
    Ok(())
}

#[test]
fn test_buffer_reserve_allocates_uninitialized_storage() -> Result<()> {
    let context = context();

    let buffer = context.buffer(None, 64, true)?;

    assert_eq!(buffer.size(), 64);
    assert!(buffer.is_dynamic());
    assert_eq!(
        headless(&context).buffer_contents(buffer.handle()?).map(|b| b.len()),
        Some(64)
    );
    Ok(())
}

#[test]
fn test_buffer_rejects_data_with_reserve() {
    let context = context();

    let err = context.buffer(Some(&[1, 2, 3]), 16, false).unwrap_err();

    assert_eq!(err, ResourceError::ArgumentConflict("data and reserve"));
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(headless(&context).live_objects(ObjectKind::Buffer), 0);
}

#[test]
fn test_buffer_rejects_empty_size() {
    let context = context();

    assert_eq!(context.buffer(None, 0, false).unwrap_err(), ResourceError::EmptyBuffer);
    assert_eq!(context.buffer(Some(&[]), 0, false).unwrap_err(), ResourceError::EmptyBuffer);
}

#[test]
fn test_buffer_rejects_sizes_the_driver_cannot_address() {
    // ARRANGE
    let context = context();
    let size = MAX_BUFFER_SIZE + 1;

    // ACT
    let err = context.buffer(None, size, false).unwrap_err();

    // ASSERT
    assert_eq!(err, ResourceError::BufferTooLarge(size));
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(headless(&context).live_objects(ObjectKind::Buffer), 0);
}

#[test]
fn test_buffer_allocation_failure_is_reported() {
    let context = context();
    headless(&context).fail_next_allocation();

    let err = context.buffer(None, 4, false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Allocation);
    assert_eq!(err.to_string(), "cannot create buffer");
}

#[test]
fn test_texture_rejects_invalid_components_and_samples() {
    // ARRANGE
    let context = context();
    let five = TextureDescriptor::new((4, 4), 5);
    let three_samples = TextureDescriptor {
        samples: 3,
        ..TextureDescriptor::new((4, 4), 4)
    };
    let bad_alignment = TextureDescriptor {
        alignment: 3,
        ..TextureDescriptor::new((4, 4), 4)
    };

    // ACT & ASSERT
    assert_eq!(
        context.texture(&five, None).unwrap_err(),
        ResourceError::InvalidComponents(5)
    );
    assert_eq!(
        context.texture(&three_samples, None).unwrap_err(),
        ResourceError::InvalidSamples(3)
    );
    assert_eq!(
        context.texture(&bad_alignment, None).unwrap_err(),
        ResourceError::InvalidAlignment(3)
    );
    assert_eq!(headless(&context).live_objects(ObjectKind::Texture), 0);
}

#[test]
fn test_texture_data_size_accounts_for_row_alignment() -> Result<()> {
    // ARRANGE
    let context = context();
    // 3 RGB bytes per pixel, 9 per row, padded to 12.
    let descriptor = TextureDescriptor {
        alignment: 4,
        ..TextureDescriptor::new((3, 3), 3)
    };

    // ACT
    let err = context.texture(&descriptor, Some(&[0; 27])).unwrap_err();
    let texture = context.texture(&descriptor, Some(&[0; 36]))?;

    // ASSERT
    assert_eq!(
        err,
        ResourceError::SizeMismatch {
            expected: 36,
            actual: 27
        }
    );
    assert_eq!(err.to_string(), "data size mismatch 27 != 36");
    assert_eq!(texture.size(), (3, 3));
    Ok(())
}

#[test]
fn test_texture_data_size_overflow_is_a_mismatch() {
    // ARRANGE
    let context = context();
    let descriptor = TextureDescriptor {
        float: true,
        ..TextureDescriptor::new((u32::MAX, u32::MAX), 4)
    };

    // ACT
    let err = context.texture(&descriptor, Some(&[0u8; 4])).unwrap_err();

    // ASSERT
    assert_eq!(
        err,
        ResourceError::SizeMismatch {
            expected: usize::MAX,
            actual: 4
        }
    );
    assert_eq!(headless(&context).live_objects(ObjectKind::Texture), 0);
}

#[test]
fn test_texture_upload_goes_through_the_default_unit() -> Result<()> {
    // ARRANGE
    let context = context();
    let previous = context.texture(&TextureDescriptor::new((1, 1), 1), None)?;
    context
        .driver()
        .bind_texture(TextureTarget::Texture2D, Some(previous.handle()?));

    // ACT
    let texture = context.texture(&TextureDescriptor::new((8, 4), 4), Some(&[7; 128]))?;

    // ASSERT
    let driver = headless(&context);
    assert_eq!(driver.active_unit(), context.max_texture_units() - 1);
    assert_eq!(driver.image_extent(texture.handle()?), Some((8, 4, 0)));
    assert_eq!(driver.pixel_alignment(), (1, 1));
    assert_eq!(
        context.driver().current_binding(BindingPoint::Texture2D),
        Some(previous.handle()?)
    );
    Ok(())
}

#[test]
fn test_multisample_texture_cannot_take_data() -> Result<()> {
    let context = context();
    let descriptor = TextureDescriptor {
        samples: 4,
        ..TextureDescriptor::new((4, 4), 4)
    };

    let err = context.texture(&descriptor, Some(&[0; 64])).unwrap_err();
    let texture = context.texture(&descriptor, None)?;

    assert_eq!(err, ResourceError::MultisampleWithData);
    assert_eq!(headless(&context).image_extent(texture.handle()?), Some((4, 4, 4)));
    Ok(())
}

#[test]
fn test_depth_texture_is_single_component_float() -> Result<()> {
    let context = context();

    let depth = context.depth_texture(&DepthTextureDescriptor::new((2, 2)), Some(&[0; 16]))?;

    assert!(depth.info().depth);
    assert_eq!(depth.info().components, 1);
    assert_eq!(depth.info().format(), TexelFormat::Depth);
    Ok(())
}

#[test]
fn test_renderbuffers_validate_like_textures() -> Result<()> {
    let context = context();

    let err = context
        .renderbuffer(&RenderbufferDescriptor::new((4, 4), 0))
        .unwrap_err();
    let color = context.renderbuffer(&RenderbufferDescriptor::new((4, 4), 4))?;
    let depth = context.depth_renderbuffer((4, 4), 2)?;

    assert_eq!(err, ResourceError::InvalidComponents(0));
    assert_eq!(color.info().extent(), (4, 4, 0));
    assert_eq!(headless(&context).image_extent(depth.handle()?), Some((4, 4, 2)));
    assert_eq!(
        context.driver().current_binding(BindingPoint::Renderbuffer),
        None
    );
    Ok(())
}

#[test]
fn test_copy_buffer_with_negative_size_copies_the_rest() -> Result<()> {
    // ARRANGE
    let context = context();
    let src = context.buffer(Some(&[1, 2, 3, 4, 5, 6]), 0, false)?;
    let dst = context.buffer(None, 8, false)?;

    // ACT
    context.copy_buffer(&dst, &src, -1, 2, 1)?;

    // ASSERT
    assert_eq!(
        headless(&context).buffer_contents(dst.handle()?),
        Some(vec![0, 3, 4, 5, 6, 0, 0, 0])
    );
    Ok(())
}

#[test]
fn test_copy_buffer_checks_ranges() -> Result<()> {
    // ARRANGE
    let context = context();
    let src = context.buffer(None, 8, false)?;
    let dst = context.buffer(None, 4, false)?;

    // ACT & ASSERT
    let err = context.copy_buffer(&dst, &src, 8, 0, 0).unwrap_err();
    assert_eq!(err, ResourceError::BufferOverflow);
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.to_string(), "buffer overflow");

    assert_eq!(
        context.copy_buffer(&dst, &src, 2, -1, 0).unwrap_err(),
        ResourceError::BufferUnderflow
    );
    assert_eq!(
        context.copy_buffer(&dst, &src, 4, 6, 0).unwrap_err(),
        ResourceError::BufferOverflow
    );
    assert_eq!(
        context.copy_buffer(&dst, &src, i64::MAX, 1, 0).unwrap_err(),
        ResourceError::BufferOverflow
    );

    context.copy_buffer(&dst, &src, 4, 4, 0)?;
    Ok(())
}
