//! Property tests for the OKLCH codec
//!
//! 1. OKLCH -> hex -> OKLCH stays close to the input for in-gamut colors
//!    above near-black; hue is only compared for chromatic colors.
//! 2. hex -> OKLCH -> hex reproduces the hex within one step per channel.
//! 3. `format_oklch` output has fixed precision and parses back.
//! 4. The conversion agrees with an independent implementation (palette).

use duchi_core::color::{format_oklch, hex_to_oklch, oklch_to_hex, parse_oklch, Oklch, Srgb};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;

const COMPONENT_TOLERANCE: f64 = 0.02;
// Hue is compared as a fraction of the full turn
const HUE_TOLERANCE_DEGREES: f64 = COMPONENT_TOLERANCE * 360.0;
// Below this chroma the hue of an 8-bit color is not well defined
const MIN_CHROMA_FOR_HUE: f64 = 0.05;
// At L <= 0.05 one 8-bit step is larger than the tolerance in L and C
const MIN_ROUND_TRIP_LIGHTNESS: f64 = 0.06;

static FORMAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^oklch\(\d+\.\d{3} \d+\.\d{3} \d+\.\d\)$").unwrap());

fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn arb_srgb() -> impl Strategy<Value = Srgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Srgb::new(r, g, b))
}

// Pulls chroma in until the color fits sRGB, so no sample is rejected
fn into_gamut(mut color: Oklch) -> Oklch {
    while !color.is_in_srgb_gamut() {
        color.c *= 0.95;
    }
    color
}

fn arb_in_gamut_oklch() -> impl Strategy<Value = Oklch> {
    (MIN_ROUND_TRIP_LIGHTNESS..=1.0f64, 0.0f64..0.4, 0.0f64..360.0)
        .prop_map(|(l, c, h)| into_gamut(Oklch::new(l, c, h)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn oklch_survives_hex_round_trip(color in arb_in_gamut_oklch()) {
        let hex = oklch_to_hex(&color);
        let back = hex_to_oklch(&hex).unwrap();

        prop_assert!(
            (back.l - color.l).abs() <= COMPONENT_TOLERANCE,
            "L {} vs {}",
            back.l,
            color.l
        );
        prop_assert!(
            (back.c - color.c).abs() <= COMPONENT_TOLERANCE,
            "C {} vs {}",
            back.c,
            color.c
        );
        if color.c >= MIN_CHROMA_FOR_HUE {
            prop_assert!(
                hue_distance(back.h, color.h) <= HUE_TOLERANCE_DEGREES,
                "H {} vs {}",
                back.h,
                color.h
            );
        }
    }

    #[test]
    fn hex_survives_oklch_round_trip(rgb in arb_srgb()) {
        let hex = rgb.to_hex();
        let back = Srgb::from_hex(&oklch_to_hex(&hex_to_oklch(&hex).unwrap())).unwrap();

        prop_assert!(back.r.abs_diff(rgb.r) <= 1, "{} -> {}", hex, back);
        prop_assert!(back.g.abs_diff(rgb.g) <= 1, "{} -> {}", hex, back);
        prop_assert!(back.b.abs_diff(rgb.b) <= 1, "{} -> {}", hex, back);
    }

    #[test]
    fn hex_to_oklch_stays_in_range(rgb in arb_srgb()) {
        let color = hex_to_oklch(&rgb.to_hex()).unwrap();

        prop_assert!((-1e-9..=1.0 + 1e-6).contains(&color.l));
        prop_assert!(color.c >= 0.0 && color.c < 0.4);
        prop_assert!((0.0..360.0).contains(&color.h));
    }

    #[test]
    fn formatted_oklch_parses_back(l in 0.0f64..=1.0, c in 0.0f64..0.4, h in 0.0f64..360.0) {
        let text = format_oklch(&Oklch::new(l, c, h));
        prop_assert!(FORMAT_PATTERN.is_match(&text), "unexpected format {}", text);

        let parsed = parse_oklch(&text).unwrap();
        prop_assert!((parsed.l - l).abs() <= 0.0005 + 1e-9);
        prop_assert!((parsed.c - c).abs() <= 0.0005 + 1e-9);
        prop_assert!((parsed.h - h).abs() <= 0.05 + 1e-9);
        prop_assert_eq!(format_oklch(&parsed), text);
    }

    #[test]
    fn any_oklch_produces_a_valid_hex(l in -0.5f64..1.5, c in 0.0f64..1.0, h in -720.0f64..720.0) {
        let hex = oklch_to_hex(&Oklch::new(l, c, h));
        prop_assert_eq!(hex.len(), 7);
        prop_assert!(Srgb::from_hex(&hex).is_some());
    }
}

#[test]
fn parse_reference_example() {
    let color = parse_oklch("oklch(65% 0.2 250)").unwrap();
    assert!((color.l - 0.65).abs() < 1e-12);
    assert!((color.c - 0.2).abs() < 1e-12);
    assert!((color.h - 250.0).abs() < 1e-12);

    assert_eq!(parse_oklch("not-a-color"), None);
}

#[test]
fn agrees_with_palette_reference() {
    use palette::{IntoColor, Oklch as PaletteOklch, Srgb as PaletteSrgb};

    let samples = [
        (0.6, 0.1, 30.0),
        (0.7, 0.1, 150.0),
        (0.5, 0.1, 260.0),
        (0.8, 0.05, 90.0),
        (0.35, 0.02, 250.0),
    ];

    for (l, c, h) in samples {
        let ours = Oklch::new(l, c, h).to_srgb();

        let reference: PaletteSrgb<f64> = PaletteOklch::new(l, c, h).into_color();
        let reference: PaletteSrgb<u8> = reference.into_format();

        assert!(ours.r.abs_diff(reference.red) <= 2, "{:?} red", (l, c, h));
        assert!(ours.g.abs_diff(reference.green) <= 2, "{:?} green", (l, c, h));
        assert!(ours.b.abs_diff(reference.blue) <= 2, "{:?} blue", (l, c, h));
    }
}
