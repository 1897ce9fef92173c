/// Reasons a sample gets rejected.
///
/// These never leave the crate: every variant collapses into
/// [`SampleResult::Invalid`](crate::SampleResult::Invalid). With the `defmt`
/// feature enabled the reason is logged.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// The line stopped changing before 40 data bits were captured.
    Timeout,
    /// The transition budget ran out before 40 data bits were captured.
    ShortFrame,
    /// Checksum byte did not match the sum of the data bytes.
    ChecksumMismatch,
}
