//! Builtin validation suites, one per builtin transform

use super::{Suite, column_le, range_check, unique_on};

pub(super) fn nyt_cases_counties() -> Suite {
    Suite::new("nyt_cases_counties")
        .test(
            "cases_vs_deaths",
            column_le("deaths", "cases"),
            "Death counts cannot exceed case counts.",
        )
        .test(
            "unique_records",
            unique_on(&["date", "fips"]),
            "Only one record per FIPs, per date allowed.",
        )
        .test(
            "cases_range_test",
            range_check("cases", 0.0, 10e6),
            "Cases must be non-negative and <= 10M",
        )
        .test(
            "deaths_range_test",
            range_check("deaths", 0.0, 1e5),
            "Deaths must be non-negative and <= 100K",
        )
}

pub(super) fn cdc_vaccines_counties() -> Suite {
    Suite::new("cdc_vaccines_counties")
        .test(
            "unique_records",
            unique_on(&["date", "fips"]),
            "Only one record per FIPs, per date allowed.",
        )
        .test(
            "completion_pct_range_test",
            range_check("series_complete_pop_pct", 0.0, 100.0),
            "Series completion percentage must be between 0 and 100",
        )
}

pub(super) fn acs_population_counties() -> Suite {
    Suite::new("acs_population_counties")
        .test(
            "unique_fips",
            unique_on(&["fips"]),
            "Only one record per FIPs allowed.",
        )
        .test(
            "adults_vs_total",
            column_le("population_18plus", "total_population"),
            "Adult population cannot exceed total population.",
        )
}
