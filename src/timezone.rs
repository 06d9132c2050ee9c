use time_tz::Tz;

/// Look up the timezone called `canonical_timezone`, e.g. "Asia/Kolkata".
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}
