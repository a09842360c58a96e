use color_eyre::eyre::{Result, bail, eyre};

/// Parses `#RRGGBB` or `#RRGGBBAA` into RGBA bytes. Missing alpha means opaque.
pub fn parse_hex_color(value: &str) -> Result<[u8; 4]> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        bail!("expected #RRGGBB or #RRGGBBAA, got {value:?}");
    }

    let channel = |i: usize| -> Result<u8> {
        let digits = hex
            .get(i..i + 2)
            .ok_or_else(|| eyre!("non-ascii color {value:?}"))?;
        u8::from_str_radix(digits, 16).map_err(|e| eyre!("invalid color {value:?}: {e}"))
    };

    let alpha = if hex.len() == 8 { channel(6)? } else { u8::MAX };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}
