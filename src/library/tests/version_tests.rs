//! Tests for kernel version parsing and ordering.

use rstest::rstest;

use crate::library::domain::KernelVersion;
use crate::library::error::LibraryError;

#[rstest]
#[case("0.12.0.322", &[0, 12, 0, 322], None)]
#[case("1", &[1], None)]
#[case("0.11.0-dev4", &[0, 11, 0], Some(4))]
#[case(" 2.0 ", &[2, 0], None)]
fn parses_valid_versions(
    #[case] text: &str,
    #[case] components: &[u32],
    #[case] dev: Option<u32>,
) -> eyre::Result<()> {
    let version = KernelVersion::parse(text)?;
    assert_eq!(version.components(), components);
    assert_eq!(version.dev(), dev);
    Ok(())
}

#[rstest]
#[case("")]
#[case("1.x")]
#[case("1.2.3.4.5")]
#[case("1..2")]
#[case("1.0-devx")]
fn rejects_invalid_versions(#[case] text: &str) {
    assert_eq!(
        KernelVersion::parse(text),
        Err(LibraryError::InvalidKernelVersion(text.to_owned()))
    );
}

#[rstest]
#[case("0.12", "0.12.0.0")]
#[case("1.0.0", "1")]
fn missing_components_compare_as_zero(#[case] short: &str, #[case] long: &str) -> eyre::Result<()> {
    let left = KernelVersion::parse(short)?;
    let right = KernelVersion::parse(long)?;
    assert_eq!(left, right);
    Ok(())
}

#[rstest]
#[case("0.11.9", "0.12")]
#[case("0.12.0-dev1", "0.12.0")]
#[case("0.12.0-dev1", "0.12.0-dev2")]
#[case("0.12.0", "0.12.0.1-dev1")]
fn orders_versions(#[case] lower: &str, #[case] higher: &str) -> eyre::Result<()> {
    let low = KernelVersion::parse(lower)?;
    let high = KernelVersion::parse(higher)?;
    assert!(low < high, "{low} should sort before {high}");
    Ok(())
}

#[rstest]
fn serialises_as_display_string() -> eyre::Result<()> {
    let version = KernelVersion::parse("0.12.0-dev3")?;
    let json = serde_json::to_value(&version)?;
    assert_eq!(json, serde_json::json!("0.12.0-dev3"));
    let back: KernelVersion = serde_json::from_value(json)?;
    assert_eq!(back, version);
    Ok(())
}

#[rstest]
fn deserialising_a_bad_version_fails() {
    let result = serde_json::from_value::<KernelVersion>(serde_json::json!("one.two"));
    assert!(result.is_err());
}
