use approx::assert_relative_eq;
use glass_logo::color::Rgb;

#[test]
fn should_parse_hex_forms() {
    assert_eq!(Rgb::parse("#aa87f4").unwrap(), Rgb::from_u32(0xaa87f4));
    assert_eq!(Rgb::parse("606060").unwrap(), Rgb::from_u32(0x606060));
    assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
    assert_eq!(Rgb::parse("  #101010 ").unwrap().to_u32(), 0x101010);
}

#[test]
fn should_reject_malformed_colours() {
    assert!(Rgb::parse("#12345").is_err());
    assert!(Rgb::parse("#gggggg").is_err());
    assert!(Rgb::parse("").is_err());
}

#[test]
fn should_print_lowercase_hex() {
    assert_eq!(Rgb::from_u32(0xAA87F4).to_string(), "#aa87f4");
}

#[test]
fn should_convert_to_linear() {
    let [r, g, b] = Rgb::WHITE.to_linear();
    assert_relative_eq!(r, 1.0);
    assert_relative_eq!(g, 1.0);
    assert_relative_eq!(b, 1.0);
    let [grey, _, _] = Rgb::from_u32(0x808080).to_linear();
    assert_relative_eq!(grey, 0.2158605, epsilon = 1e-5);
    assert_eq!(Rgb::from_u32(0).to_wgpu().a, 1.0);
}

#[test]
fn should_roundtrip_through_json_strings() {
    let json = serde_json::to_string(&Rgb::from_u32(0x87b4f4)).unwrap();
    assert_eq!(json, "\"#87b4f4\"");
    let parsed: Rgb = serde_json::from_str("\"#87B4F4\"").unwrap();
    assert_eq!(parsed, Rgb::from_u32(0x87b4f4));
    assert!(serde_json::from_str::<Rgb>("\"purple\"").is_err());
}
