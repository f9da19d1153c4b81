/// Shared fixture builders: realistic UCI EEG session text.
#[allow(unused)]
pub const ALCOHOLIC_HEADER: &str = "# co2a0000364.rd\n\
# 120 trials, 64 chans, 416 samples 368 post_stim samples\n\
# 3.906000 msecs uV\n";

#[allow(unused)]
pub const CONTROL_HEADER: &str = "# co2c0000337.rd\n\
# 120 trials, 64 chans, 416 samples 368 post_stim samples\n\
# 3.906000 msecs uV\n";

/// A session stream with the given condition line and data rows.
#[allow(unused)]
pub fn session(first_three: &str, condition_line: &str, data: &str) -> String {
    format!("{first_three}{condition_line}\n{data}")
}

/// The canonical small session: one trial, two sensors, two samples each,
/// with the per-sensor sub-header comments the real files carry.
#[allow(unused)]
pub fn two_sensor_session() -> String {
    session(
        ALCOHOLIC_HEADER,
        "# S1 obj , trial 0",
        "# FP1 chan 0\n\
         0 FP1 0 -8.921\n\
         0 FP1 1 -8.433\n\
         # FP2 chan 1\n\
         0 FP2 0 0.305\n\
         0 FP2 1 2.594\n",
    )
}
