//! CSV and JSON output for titration curves.

use crate::curve::TitrationCurve;
use crate::error::TitrationResult;
use std::io::Write;

/// Write `volume,ph` rows, one per curve point, after a header line.
pub fn write_csv<W: Write>(curve: &TitrationCurve, mut writer: W) -> TitrationResult<()> {
    writeln!(writer, "volume,ph")?;
    for point in &curve.points {
        writeln!(writer, "{},{}", point.volume, point.ph)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(curve: &TitrationCurve) -> TitrationResult<String> {
    let mut buf = Vec::new();
    write_csv(curve, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty-printed JSON with both points and markers.
pub fn to_json(curve: &TitrationCurve) -> TitrationResult<String> {
    Ok(serde_json::to_string_pretty(curve)?)
}
