//! Trailing moving average for chart columns
//!
//! Applied by the caller after generation. The first `window - 1` outputs
//! average over the points seen so far, so the smoothed curve starts at the
//! same instant as the raw one.

use rust_decimal::Decimal;

use crate::error::ChartError;

/// Trailing simple moving average over `window` points
pub fn moving_average(values: &[Decimal], window: usize) -> Result<Vec<Decimal>, ChartError> {
    if window == 0 {
        return Err(ChartError::InvalidWindow(window));
    }

    let mut result = Vec::with_capacity(values.len());
    let mut sum = Decimal::ZERO;

    for (i, value) in values.iter().enumerate() {
        sum += *value;
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        result.push(sum / Decimal::from(count));
    }

    Ok(result)
}

/// Smooth one numeric column of a generated chart in place
pub fn smooth_column<T, F>(rows: &mut [T], window: usize, column: F) -> Result<(), ChartError>
where
    F: Fn(&mut T) -> &mut Decimal,
{
    let raw: Vec<Decimal> = rows.iter_mut().map(|row| *column(row)).collect();
    let smoothed = moving_average(&raw, window)?;
    for (row, value) in rows.iter_mut().zip(smoothed) {
        *column(row) = value;
    }
    Ok(())
}
