//! Shared helpers for savepoint-core integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use savepoint_core::{
    Component, ComponentKind, FontRegistry, Frame, ImageRegistry, PermissionCheck, Workspace,
};

pub fn png_data_uri() -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode([0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    )
}

pub fn gif_data_uri() -> String {
    format!("data:image/gif;base64,{}", STANDARD.encode(b"GIF89a\x01\x00"))
}

pub fn otf_base64() -> String {
    STANDARD.encode(b"OTTO\x00\x0A")
}

/// A workspace with the editor's built-in resources registered.
pub fn empty_workspace() -> Workspace {
    let mut fonts = FontRegistry::new(["Arial"]);
    fonts
        .register_base64("Arial", &otf_base64())
        .expect("built-in font");
    let mut images = ImageRegistry::new(["background", "frame"]);
    for name in ["background", "frame"] {
        images
            .register_base64(name, &png_data_uri(), false)
            .expect("built-in image");
    }
    Workspace::new(fonts, images)
}

/// A workspace with a realistic mix of components and user resources.
pub fn populated_workspace() -> Workspace {
    let mut ws = empty_workspace();
    ws.settings.project_name = "Main Menu".to_string();
    ws.settings.width = 1920;
    ws.settings.height = 1080;

    ws.fonts
        .register_base64("Brand", &otf_base64())
        .expect("font");
    ws.images
        .register_base64("logo", &png_data_uri(), false)
        .expect("image");
    ws.images
        .register_base64("spinner", &gif_data_uri(), true)
        .expect("gif");

    let header = Component::with_id(
        "header",
        ComponentKind::Group {
            components: vec![
                Component::with_id(
                    "header-bg",
                    ComponentKind::Image {
                        image: "background".into(),
                    },
                ),
                Component::with_id(
                    "title",
                    ComponentKind::Text {
                        text: "Welcome".into(),
                        font: Some("Brand".into()),
                        font_size: 32.0,
                        color: "#ffffff".into(),
                    },
                )
                .with_frame(Frame {
                    x: 40.0,
                    y: 12.0,
                    width: 400.0,
                    height: 48.0,
                }),
            ],
        },
    )
    .named("Header");

    let shop = Component::with_id(
        "shop",
        ComponentKind::Template {
            template: "shop-card".into(),
            components: vec![Component::with_id(
                "buy",
                ComponentKind::Button {
                    label: "Buy".into(),
                    checks: vec![PermissionCheck::generator().into()],
                },
            )],
        },
    );

    ws.tree.insert_roots(vec![header, shop]);
    ws.invisible.push("buy".into());
    ws
}
