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


use approx::assert_relative_eq;
use glint_core::renderer::api::*;
use glint_core::{Context, ContextSettings, ResourceError};
use glint_infra::HeadlessDriver;

// --- Test Setup ---
fn context_with(driver: HeadlessDriver, settings: ContextSettings) -> Context {
    Context::new(Box::new(driver), settings).unwrap()
}

fn context() -> Context {
    context_with(HeadlessDriver::new(), ContextSettings::default())
}

fn headless(context: &Context) -> &HeadlessDriver {
    context.driver().as_any().downcast_ref().unwrap()
}
// ---

#[test]
fn test_default_settings_apply_blending_and_primitive_restart() {
    // ACT
    let context = context();

    // ASSERT
    assert_eq!(
        headless(&context).blend_factors(),
        Some((BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha))
    );
    assert!(context
        .driver()
        .is_enabled(EnableFlag::PrimitiveRestartFixedIndex));
    assert_eq!(context.max_texture_units(), 16);
    assert_eq!(context.default_texture_unit(), 15);
}

#[test]
fn test_settings_can_disable_initial_state() {
    let settings = ContextSettings {
        primitive_restart: false,
        alpha_blending_func: false,
        default_texture_unit: Some(2),
        ..ContextSettings::default()
    };

    let context = context_with(HeadlessDriver::new(), settings);

    assert_eq!(headless(&context).blend_factors(), None);
    assert!(!context
        .driver()
        .is_enabled(EnableFlag::PrimitiveRestartFixedIndex));
    assert_eq!(context.default_texture_unit(), 2);
}

#[test]
fn test_out_of_range_texture_unit_is_rejected() {
    // ARRANGE
    let settings = ContextSettings {
        default_texture_unit: Some(8),
        ..ContextSettings::default()
    };

    // ACT
    let err = Context::new(
        Box::new(HeadlessDriver::new().with_max_texture_units(8)),
        settings,
    )
    .unwrap_err();
    let context = context();

    // ASSERT
    assert_eq!(err, ResourceError::InvalidTextureUnit { unit: 8, max: 8 });
    assert!(context.set_default_texture_unit(16).is_err());
    assert!(context.set_default_texture_unit(3).is_ok());
    assert_eq!(context.default_texture_unit(), 3);
}

#[test]
fn test_version_information() {
    // ARRANGE
    let context = context();
    let anonymous = context_with(
        HeadlessDriver::new().with_strings(None, Some("soft"), None),
        ContextSettings::default(),
    );

    // ACT & ASSERT
    assert_eq!(context.version_code(), 450);
    assert_eq!(context.vendor().unwrap(), "glint");
    assert_eq!(context.renderer().unwrap(), "headless");
    assert_eq!(
        anonymous.vendor().unwrap_err(),
        ResourceError::MissingDriverString("vendor")
    );
    assert_eq!(
        anonymous.version().unwrap_err().to_string(),
        "missing version information"
    );
    assert_eq!(anonymous.renderer().unwrap(), "soft");
}

#[test]
fn test_version_code_saturates_on_garbage_numbers() {
    // ARRANGE
    let garbage = context_with(
        HeadlessDriver::new().with_version(i32::MAX, i32::MAX),
        ContextSettings::default(),
    );
    let negative = context_with(
        HeadlessDriver::new().with_version(-3, 3),
        ContextSettings::default(),
    );

    // ACT & ASSERT
    assert_eq!(garbage.version_code(), u32::MAX);
    assert_eq!(negative.version_code(), 30);
}

#[test]
fn test_clear_with_viewport_scissors_only_that_call() {
    // ARRANGE
    let context = context();
    let rect = Viewport::from((10, 20, 30, 40));

    // ACT
    context.clear(0.25, 0.5, 0.75, 1.0, Some(rect));
    context.clear(0.0, 0.0, 0.0, 0.0, None);

    // ASSERT
    let driver = headless(&context);
    assert_eq!(
        driver.clears(),
        [(ClearMask::COLOR_DEPTH, Some(rect)), (ClearMask::COLOR_DEPTH, None)]
    );
    assert!(!context.driver().is_enabled(EnableFlag::ScissorTest));
    assert_relative_eq!(driver.last_clear_color()[0], 0.0);
}

#[test]
fn test_clear_color_is_forwarded() {
    let context = context();

    context.clear(0.25, 0.5, 0.75, 1.0, None);

    let [r, g, b, a] = headless(&context).last_clear_color();
    assert_relative_eq!(r, 0.25);
    assert_relative_eq!(g, 0.5);
    assert_relative_eq!(b, 0.75);
    assert_relative_eq!(a, 1.0);
}

#[test]
fn test_rasterization_properties() {
    // ARRANGE
    let context = context();

    // ACT
    context.set_line_width(2.5);
    context.set_point_size(4.0);
    context.set_wireframe(true);

    // ASSERT
    assert_relative_eq!(context.line_width(), 2.5);
    assert_relative_eq!(context.point_size(), 4.0);
    assert!(context.wireframe());
    assert_eq!(headless(&context).current_polygon_mode(), PolygonMode::Line);

    context.set_wireframe(false);
    assert_eq!(headless(&context).current_polygon_mode(), PolygonMode::Fill);
}

#[test]
fn test_viewport_accepts_both_tuple_forms() {
    let context = context();

    context.set_viewport((640, 480));
    assert_eq!(context.viewport(), Viewport::from((0, 0, 640, 480)));

    context.set_viewport((5, 6, 7, 8));
    assert_eq!(context.viewport(), Viewport::from((5, 6, 7, 8)));
}

#[test]
fn test_pixel_alignment_is_validated() {
    let context = context();

    context.set_pixel_alignment((2, 8)).unwrap();
    let err = context.set_pixel_alignment((4, 3)).unwrap_err();

    assert_eq!(context.pixel_alignment(), (2, 8));
    assert_eq!(err, ResourceError::InvalidAlignment(3));
}

#[test]
fn test_error_flag_is_read_and_cleared() {
    let context = context();
    headless(&context).raise_error(0x0505);

    assert_eq!(context.error(), DriverError::OutOfMemory);
    assert_eq!(context.error(), DriverError::NoError);
}

#[test]
fn test_capabilities_toggle() {
    let context = context();

    context.enable(EnableFlag::DepthTest);
    assert!(context.driver().is_enabled(EnableFlag::DepthTest));
    context.disable(EnableFlag::DepthTest);
    assert!(!context.driver().is_enabled(EnableFlag::DepthTest));

    context.finish();
    assert!(headless(&context).calls().iter().any(|call| call == "finish"));
}
