use crate::rules::DecayConfig;

/// Time-decay factor for perishable contributions: `2^(-days / halfLife)`.
///
/// Past `maximum_days` the factor drops straight to `minimum_factor`; it never
/// goes below that floor. Negative elapsed time (future timestamps) counts as 0.
pub fn decay_factor(elapsed_days: f64, decay: &DecayConfig) -> f64 {
    let elapsed = elapsed_days.max(0.0);
    if elapsed > decay.maximum_days {
        return decay.minimum_factor;
    }
    let raw = 2f64.powf(-elapsed / decay.half_life_days);
    raw.max(decay.minimum_factor)
}
