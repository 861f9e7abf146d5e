// Byte-size scaling for transfer metrics.

use crate::model::{SizeUnit, TransferMetrics};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Pick the display unit for `bytes`. Thresholds are strict: 1024 is
/// already KB and 1048576 is already MB.
pub fn unit_for(bytes: u64) -> SizeUnit {
    if bytes < KIB {
        SizeUnit::Bytes
    } else if bytes < MIB {
        SizeUnit::Kb
    } else {
        SizeUnit::Mb
    }
}

/// Pair a flow-file count with its byte volume scaled to a display unit.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn transfer_metrics(flow_file_count: u64, bytes: u64) -> TransferMetrics {
    let unit = unit_for(bytes);
    let (size, formatted_size) = match unit {
        SizeUnit::Bytes => (bytes as f64, format!("{bytes} bytes")),
        SizeUnit::Kb => {
            let kb = bytes as f64 / KIB as f64;
            (kb, format!("{} KB", grouped_2dp(kb)))
        }
        SizeUnit::Mb => {
            let mb = bytes as f64 / MIB as f64;
            (mb, format!("{} MB", grouped_2dp(mb)))
        }
    };
    TransferMetrics {
        flow_file_count,
        size,
        size_unit: unit,
        formatted_size,
    }
}

/// Two decimal places with comma thousands separators: `1,500.00`.
fn grouped_2dp(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3 + 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}
