use avd_core::Color;
use avd_data::parse;
use avd_skia::{render_pixels, render_png, RasterConfig, RenderError};

const RED_LINE: &str = r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
    android:width="24dp" android:height="24dp"
    android:viewportWidth="24" android:viewportHeight="24">
    <path android:fillColor="#FFFF0000" android:pathData="M0,0L24,24"/>
</vector>"##;

const HALF_TURN: &str = r##"<animated-vector xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:aapt="http://schemas.android.com/aapt">
    <aapt:attr name="android:drawable">
        <vector android:width="24dp" android:height="24dp"
            android:viewportWidth="24" android:viewportHeight="24">
            <group android:name="flip" android:pivotX="12" android:pivotY="12">
                <path android:fillColor="#FFFF0000" android:pathData="M0,0 L12,0 L12,24 L0,24 Z"/>
            </group>
        </vector>
    </aapt:attr>
    <target android:name="flip">
        <aapt:attr name="android:animation">
            <objectAnimator android:propertyName="rotation" android:duration="1000"
                android:valueFrom="0" android:valueTo="180"/>
        </aapt:attr>
    </target>
</animated-vector>"##;

const CLIPPED: &str = r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
    android:width="24dp" android:height="24dp"
    android:viewportWidth="24" android:viewportHeight="24">
    <group>
        <clip-path android:pathData="M0,0 L12,0 L12,24 L0,24 Z"/>
        <path android:fillColor="#FF0000FF" android:pathData="M0,0 L24,0 L24,24 L0,24 Z"/>
    </group>
    <path android:fillColor="#FF00FF00" android:fillAlpha="0.5"
        android:pathData="M20,20 L24,20 L24,24 L20,24 Z"/>
</vector>"##;

#[test]
fn test_fill_and_scale() {
    let doc = parse(
        r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
            android:viewportWidth="24" android:viewportHeight="24">
            <path android:fillColor="#FFFF0000" android:pathData="M0,0 L12,0 L12,12 L0,12 Z"/>
        </vector>"##,
    )
    .unwrap();
    let config = RasterConfig::for_document(&doc, 2.0);
    let frame = render_pixels(&doc, 0.0, &config).expect("render");

    assert_eq!((frame.width, frame.height), (48, 48));
    assert_eq!(frame.pixel(10, 10), Some([255, 0, 0, 255]));
    // The square covers the top-left quarter of the scaled output only.
    assert_eq!(frame.pixel(30, 30), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(48, 0), None);
}

#[test]
fn test_group_rotation_over_time() {
    let doc = parse(HALF_TURN).unwrap();
    let config = RasterConfig::new(24, 24);

    let start = render_pixels(&doc, 0.0, &config).unwrap();
    assert_eq!(start.pixel(4, 12), Some([255, 0, 0, 255]));
    assert_eq!(start.pixel(20, 12).map(|p| p[3]), Some(0));

    let end = render_pixels(&doc, 1000.0, &config).unwrap();
    assert_eq!(end.pixel(4, 12).map(|p| p[3]), Some(0));
    assert_eq!(end.pixel(20, 12), Some([255, 0, 0, 255]));

    // Seeking back reproduces the first frame exactly.
    assert_eq!(render_pixels(&doc, 0.0, &config).unwrap(), start);
}

#[test]
fn test_clip_and_alpha() {
    let doc = parse(CLIPPED).unwrap();
    let config = RasterConfig::new(24, 24).with_background(Color::argb(255, 255, 255, 255));
    let frame = render_pixels(&doc, 0.0, &config).unwrap();

    assert_eq!(frame.pixel(4, 4), Some([0, 0, 255, 255]));
    // Clipped away, so the background shows.
    assert_eq!(frame.pixel(16, 4), Some([255, 255, 255, 255]));

    // Half-transparent green over white.
    let [r, g, b, a] = frame.pixel(22, 22).unwrap();
    assert_eq!(a, 255);
    assert_eq!(g, 255);
    assert!((126..=129).contains(&r), "r = {r}");
    assert!((126..=129).contains(&b), "b = {b}");
}

#[test]
fn test_png_output_is_deterministic() {
    let config = RasterConfig::new(48, 48);
    let first = render_png(&parse(RED_LINE).unwrap(), 250.0, &config).unwrap();
    let second = render_png(&parse(RED_LINE).unwrap(), 250.0, &config).unwrap();

    assert_eq!(&first[..4], &[0x89, b'P', b'N', b'G']);
    assert_eq!(first, second);

    let animated = parse(HALF_TURN).unwrap();
    assert_eq!(
        render_png(&animated, 333.0, &config).unwrap(),
        render_png(&parse(HALF_TURN).unwrap(), 333.0, &config).unwrap()
    );
}

#[test]
fn test_invalid_size() {
    let doc = parse(RED_LINE).unwrap();
    let err = render_png(&doc, 0.0, &RasterConfig::new(0, 24)).unwrap_err();
    assert_eq!(err, RenderError::InvalidSize { width: 0, height: 24 });
}

fn gradient_square(gradient: &str, fill_alpha: f32) -> String {
    format!(
        r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
            xmlns:aapt="http://schemas.android.com/aapt"
            android:viewportWidth="24" android:viewportHeight="24">
            <path android:pathData="M0,0 L24,0 L24,24 L0,24 Z" android:fillAlpha="{fill_alpha}">
                <aapt:attr name="android:fillColor">{gradient}</aapt:attr>
            </path>
        </vector>"##
    )
}

fn red_dominant(p: [u8; 4]) -> bool {
    p[3] == 255 && p[0] > 200 && p[2] < 55
}

fn blue_dominant(p: [u8; 4]) -> bool {
    p[3] == 255 && p[2] > 200 && p[0] < 55
}

#[test]
fn test_linear_gradient() {
    let doc = parse(&gradient_square(
        r##"<gradient android:type="linear" android:startX="0" android:startY="0"
            android:endX="24" android:endY="0"
            android:startColor="#FFFF0000" android:endColor="#FF0000FF"/>"##,
        1.0,
    ))
    .unwrap();
    let frame = render_pixels(&doc, 0.0, &RasterConfig::new(24, 24)).unwrap();

    let left = frame.pixel(0, 12).unwrap();
    let right = frame.pixel(23, 12).unwrap();
    assert!(red_dominant(left), "left = {left:?}");
    assert!(blue_dominant(right), "right = {right:?}");
    assert!(red_dominant(frame.pixel(0, 23).unwrap()));
}

#[test]
fn test_radial_gradient() {
    let doc = parse(&gradient_square(
        r##"<gradient android:type="radial" android:centerX="12" android:centerY="12"
            android:gradientRadius="12">
            <item android:offset="0" android:color="#FFFF0000"/>
            <item android:offset="1" android:color="#FF0000FF"/>
        </gradient>"##,
        1.0,
    ))
    .unwrap();
    let frame = render_pixels(&doc, 0.0, &RasterConfig::new(24, 24)).unwrap();

    assert!(red_dominant(frame.pixel(12, 12).unwrap()));
    assert!(blue_dominant(frame.pixel(0, 12).unwrap()));
    // Clamped beyond the radius.
    assert!(blue_dominant(frame.pixel(0, 0).unwrap()));
}

#[test]
fn test_sweep_gradient() {
    let doc = parse(&gradient_square(
        r##"<gradient android:type="sweep" android:centerX="12" android:centerY="12">
            <item android:offset="0" android:color="#FFFF0000"/>
            <item android:offset="1" android:color="#FF0000FF"/>
        </gradient>"##,
        1.0,
    ))
    .unwrap();
    let frame = render_pixels(&doc, 0.0, &RasterConfig::new(24, 24)).unwrap();

    // The sweep starts on the positive x axis and turns clockwise, so just below the axis is
    // the start of the ramp and just above it is the end.
    let below = frame.pixel(20, 13).unwrap();
    let above = frame.pixel(20, 10).unwrap();
    assert!(red_dominant(below), "below = {below:?}");
    assert!(blue_dominant(above), "above = {above:?}");
}

#[test]
fn test_fill_alpha_multiplies_stop_alpha() {
    let translucent = r##"<gradient android:startX="0" android:startY="0"
        android:endX="24" android:endY="0"
        android:startColor="#80FF0000" android:endColor="#80FF0000"/>"##;
    let config = RasterConfig::new(24, 24);

    let full = render_pixels(&parse(&gradient_square(translucent, 1.0)).unwrap(), 0.0, &config)
        .unwrap()
        .pixel(12, 12)
        .unwrap();
    assert!((126..=130).contains(&full[3]), "full = {full:?}");

    let half = render_pixels(&parse(&gradient_square(translucent, 0.5)).unwrap(), 0.0, &config)
        .unwrap()
        .pixel(12, 12)
        .unwrap();
    assert!((60..=68).contains(&half[3]), "half = {half:?}");
    assert!(half[0] > 240 && half[1] < 16 && half[2] < 16, "half = {half:?}");
}

#[test]
fn test_even_odd_leaves_a_hole() {
    let frame_with = |fill_type: &str| {
        let doc = parse(&format!(
            r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
                android:viewportWidth="24" android:viewportHeight="24">
                <path android:fillColor="#FF000000" android:fillType="{fill_type}"
                    android:pathData="M2,2 H22 V22 H2 Z M8,8 H16 V16 H8 Z"/>
            </vector>"##
        ))
        .unwrap();
        render_pixels(&doc, 0.0, &RasterConfig::new(24, 24)).unwrap()
    };

    let non_zero = frame_with("nonZero");
    assert_eq!(non_zero.pixel(4, 4), Some([0, 0, 0, 255]));
    assert_eq!(non_zero.pixel(12, 12), Some([0, 0, 0, 255]));

    let even_odd = frame_with("evenOdd");
    assert_eq!(even_odd.pixel(4, 4), Some([0, 0, 0, 255]));
    assert_eq!(even_odd.pixel(12, 12).map(|p| p[3]), Some(0));
}

fn growing_stroke(cap: &str) -> String {
    format!(
        r##"<animated-vector xmlns:android="http://schemas.android.com/apk/res/android"
            xmlns:aapt="http://schemas.android.com/aapt">
            <aapt:attr name="android:drawable">
                <vector android:viewportWidth="24" android:viewportHeight="24">
                    <path android:name="line" android:pathData="M4,12 H20"
                        android:strokeColor="#FFFF0000" android:strokeWidth="2"
                        android:strokeLineCap="{cap}"/>
                </vector>
            </aapt:attr>
            <target android:name="line">
                <aapt:attr name="android:animation">
                    <objectAnimator android:propertyName="strokeWidth" android:duration="1000"
                        android:valueFrom="2" android:valueTo="8" android:valueType="floatType"/>
                </aapt:attr>
            </target>
        </animated-vector>"##
    )
}

#[test]
fn test_animated_stroke_width_and_caps() {
    let config = RasterConfig::new(24, 24);
    let butt = parse(&growing_stroke("butt")).unwrap();

    let thin = render_pixels(&butt, 0.0, &config).unwrap();
    assert_eq!(thin.pixel(12, 11), Some([255, 0, 0, 255]));
    assert_eq!(thin.pixel(12, 14).map(|p| p[3]), Some(0));

    let thick = render_pixels(&butt, 1000.0, &config).unwrap();
    assert_eq!(thick.pixel(12, 14), Some([255, 0, 0, 255]));
    assert_eq!(thick.pixel(12, 17).map(|p| p[3]), Some(0));
    // Butt caps stop at the endpoints.
    assert_eq!(thick.pixel(2, 12).map(|p| p[3]), Some(0));

    // Square caps extend half the width past them.
    let square = parse(&growing_stroke("square")).unwrap();
    let square = render_pixels(&square, 1000.0, &config).unwrap();
    assert_eq!(square.pixel(2, 12), Some([255, 0, 0, 255]));
}

#[test]
fn test_gradient_fixture_renders() {
    let doc = parse(include_str!("../../avd-data/tests/fixtures/gradient_fill.xml")).unwrap();
    let frame = render_pixels(&doc, 0.0, &RasterConfig::for_document(&doc, 1.0)).unwrap();

    // The radial disc is red at its center.
    let center = frame.pixel(50, 50).unwrap();
    assert!(center[3] > 240 && center[0] > 240, "center = {center:?}");
    // Past the disc edge, in the corner, nothing is painted.
    assert_eq!(frame.pixel(1, 1).map(|p| p[3]), Some(0));
}
