use super::*;

#[test]
fn test_clock_from_hhmm_basic() {
    assert_eq!(clock_from_hhmm(1345), NaiveTime::from_hms_opt(13, 45, 0));
    assert_eq!(clock_from_hhmm(5), NaiveTime::from_hms_opt(0, 5, 0));
    assert_eq!(clock_from_hhmm(0), NaiveTime::from_hms_opt(0, 0, 0));
}

#[test]
fn test_clock_from_hhmm_end_of_day() {
    assert_eq!(clock_from_hhmm(2400), NaiveTime::from_hms_opt(0, 0, 0));
}

#[test]
fn test_clock_from_hhmm_rejects_garbage() {
    assert_eq!(clock_from_hhmm(-1), None);
    assert_eq!(clock_from_hhmm(2401), None);
    assert_eq!(clock_from_hhmm(1260), None);
    assert_eq!(clock_from_hhmm(9999), None);
}

#[test]
fn test_minutes_until_same_day() {
    let dep = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let arr = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
    assert_eq!(minutes_until(dep, arr), 150);
}

#[test]
fn test_minutes_until_overnight() {
    let dep = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
    let arr = NaiveTime::from_hms_opt(1, 15, 0).unwrap();
    assert_eq!(minutes_until(dep, arr), 105);
}

#[test]
fn test_weekday_index_monday_based() {
    // 2015-07-06 was a Monday
    let monday = NaiveDate::from_ymd_opt(2015, 7, 6).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2015, 7, 5).unwrap();
    assert_eq!(weekday_index(monday), 0);
    assert_eq!(weekday_index(sunday), 6);
    assert_eq!(weekday_label(weekday_index(sunday)), "Sun");
}
