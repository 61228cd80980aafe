use avd_core::display_list::{DisplayList, DrawOp};
use avd_core::props::TrimWindow;
use avd_core::renderer::{Renderer, ResolvedPaint};
use avd_core::Color;
use avd_data::{parse, Document, FillRule};
use glam::{Affine2, Vec2};

const RED_LINE: &str = r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
    android:width="24dp" android:height="24dp"
    android:viewportWidth="24" android:viewportHeight="24">
    <path android:fillColor="#FFFF0000" android:pathData="M0,0L24,24"/>
</vector>"##;

const ANIMATED: &str = r##"<animated-vector xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:aapt="http://schemas.android.com/aapt">
    <aapt:attr name="android:drawable">
        <vector android:width="24dp" android:height="24dp"
            android:viewportWidth="24" android:viewportHeight="24">
            <group android:name="rotor" android:pivotX="12" android:pivotY="12">
                <clip-path android:pathData="M0,0 L24,0 L24,24 L0,24 Z"/>
                <path android:name="blade"
                    android:fillColor="#FF000000"
                    android:strokeColor="#FFFFFFFF"
                    android:strokeWidth="1.5"
                    android:strokeLineCap="round"
                    android:pathData="M0,0 L10,0 L10,10 Z"/>
                <path android:name="ghost" android:fillColor="#00000000"
                    android:strokeColor="#FF00FF00" android:pathData="M1,1 L2,2"/>
                <path android:name="empty"/>
            </group>
            <path android:name="after" android:fillColor="#FF0000FF" android:pathData="M5,5 L6,6"/>
        </vector>
    </aapt:attr>
    <target android:name="rotor">
        <aapt:attr name="android:animation">
            <objectAnimator android:propertyName="rotation" android:duration="1000"
                android:valueFrom="0" android:valueTo="360" android:valueType="floatType"/>
        </aapt:attr>
    </target>
    <target android:name="blade">
        <aapt:attr name="android:animation">
            <set>
                <objectAnimator android:propertyName="fillColor" android:duration="1000"
                    android:valueFrom="#FF000000" android:valueTo="#FFFFFFFF"/>
                <objectAnimator android:propertyName="pathData" android:duration="1000"
                    android:valueType="pathType"
                    android:valueFrom="M0,0 L10,0 L10,10 Z"
                    android:valueTo="M0,0 L20,0 L20,20 Z"/>
            </set>
        </aapt:attr>
    </target>
</animated-vector>"##;

fn render(doc: &Document, time_ms: f64, size: f32) -> Vec<DrawOp> {
    let mut surface = DisplayList::new(size, size);
    Renderer::draw(doc, time_ms, &mut surface);
    surface.into_ops()
}

fn fills(ops: &[DrawOp]) -> Vec<(&str, &ResolvedPaint, [f32; 6])> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Fill {
                path,
                paint,
                transform,
                ..
            } => Some((path.as_str(), paint, *transform)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_static_red_path() {
    let doc = parse(RED_LINE).unwrap();
    assert_eq!(doc.total_duration_ms, 0.0);

    let ops = render(&doc, 0.0, 48.0);
    assert_eq!(ops[0], DrawOp::Clear);
    let expected = DrawOp::Fill {
        path: "M0,0L24,24".to_string(),
        paint: ResolvedPaint::Solid {
            color: Color::argb(255, 255, 0, 0),
        },
        opacity: 1.0,
        rule: FillRule::NonZero,
        trim: TrimWindow::Full,
        transform: [2.0, 0.0, 0.0, 2.0, 0.0, 0.0],
    };
    assert!(ops.contains(&expected), "ops: {:?}", ops);
    assert!(!ops.iter().any(|op| matches!(op, DrawOp::Stroke { .. })));

    // Static documents look the same at any time.
    assert_eq!(render(&doc, 0.0, 48.0), render(&doc, 12_345.0, 48.0));
}

#[test]
fn test_rotation_about_pivot() {
    let doc = parse(ANIMATED).unwrap();
    let ops = render(&doc, 500.0, 24.0);
    let (_, _, transform) = fills(&ops)
        .into_iter()
        .find(|(_, paint, _)| matches!(paint, ResolvedPaint::Solid { color } if color.r == color.g))
        .expect("blade fill");
    let m = Affine2::from_cols_array(&transform);
    // Half way through a full turn about (12, 12).
    assert!(m
        .transform_point2(Vec2::new(0.0, 0.0))
        .abs_diff_eq(Vec2::new(24.0, 24.0), 1e-3));
}

#[test]
fn test_paint_order_and_skips() {
    let doc = parse(ANIMATED).unwrap();
    let ops = render(&doc, 0.0, 24.0);

    let kinds: Vec<&str> = ops
        .iter()
        .map(|op| match op {
            DrawOp::Clear => "clear",
            DrawOp::Save => "save",
            DrawOp::Restore => "restore",
            DrawOp::Clip { .. } => "clip",
            DrawOp::Fill { .. } => "fill",
            DrawOp::Stroke { .. } => "stroke",
        })
        .collect();
    // The ghost fill is the transparent sentinel and the empty path has no data.
    assert_eq!(
        kinds,
        vec![
            "clear", "save", "save", "save", "clip", "fill", "stroke", "stroke", "restore",
            "fill", "restore", "restore"
        ]
    );

    // The clip belongs to the rotor group; the sibling after it draws outside that scope.
    let paths: Vec<&str> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Fill { path, .. } | DrawOp::Stroke { path, .. } => Some(path.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(paths.last(), Some(&"M5,5 L6,6"));
}

#[test]
fn test_color_and_path_animation() {
    let doc = parse(ANIMATED).unwrap();
    let ops = render(&doc, 500.0, 24.0);
    let blade = fills(&ops)
        .into_iter()
        .find(|(path, _, _)| path.starts_with("M 0.000"))
        .expect("morphed blade");

    assert_eq!(blade.0, "M 0.000 0.000 L 15.000 0.000 L 15.000 15.000 Z");
    assert_eq!(
        blade.1,
        &ResolvedPaint::Solid {
            color: Color::argb(255, 128, 128, 128)
        }
    );
}

#[test]
fn test_frames_are_independent_of_call_order() {
    let doc = parse(ANIMATED).unwrap();
    let mut surface = DisplayList::new(24.0, 24.0);

    Renderer::draw(&doc, 800.0, &mut surface);
    let first = surface.ops().to_vec();
    Renderer::draw(&doc, 100.0, &mut surface);
    Renderer::draw(&doc, 1200.0, &mut surface);
    Renderer::draw(&doc, 800.0, &mut surface);
    assert_eq!(surface.ops(), first.as_slice());
}

#[test]
fn test_undrawable_viewport_leaves_frame_empty() {
    let doc = parse(
        r##"<vector xmlns:android="http://schemas.android.com/apk/res/android">
            <path android:fillColor="#FFFF0000" android:pathData="M0,0L24,24"/>
        </vector>"##,
    )
    .unwrap();
    assert_eq!(render(&doc, 0.0, 24.0), vec![DrawOp::Clear]);
}
