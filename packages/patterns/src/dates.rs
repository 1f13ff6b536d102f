//! French dates, written out (`12 mars 2021`, `1er février 2020`) or
//! numeric (`12/03/2021`).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::build;

/// Month names with their abbreviated and OCR-damaged forms.
///
/// Longer forms come first so that `février` wins over `févr`.
pub const MONTHS: &str = r"(?i:janvier|janv\.?|f[ée]vrier|f[ée]vr?\.?|mars|avril|avr\.?|mai|juin|juillet|juil\.?|ao[uû]t|septembre|sept\.?|octobre|oct\.?|novembre|nov\.?|d[ée]cembre|d[ée]c\.?)";

/// A full date. Named groups: `day`, `month`, `year` for the written form,
/// `nday`, `nmonth`, `nyear` for the numeric form.
///
/// Use at most once per composed pattern.
#[must_use]
pub fn date() -> String {
    format!(
        r"(?:(?P<day>[0-3]?\d|(?i:premier))(?:[ \t]*(?i:er))?[ \t]+(?P<month>{MONTHS})[ \t]+(?P<year>(?:19|20)\d{{2}})|(?P<nday>[0-3]?\d)[ \t]*[/.-][ \t]*(?P<nmonth>[01]?\d)[ \t]*[/.-][ \t]*(?P<nyear>(?:19|20)?\d{{2}})\b)"
    )
}

/// Any date, unanchored.
pub static DATE_RE: LazyLock<Regex> = LazyLock::new(|| build(&date()));

/// Month number from a (possibly abbreviated or OCR-damaged) name.
#[must_use]
pub fn month_number(name: &str) -> Option<u32> {
    let name = crate::text::simplify(name);
    let month = match name.get(..3)? {
        "jan" => 1,
        "fev" => 2,
        "mar" => 3,
        "avr" => 4,
        "mai" => 5,
        "jui" if name.starts_with("juin") => 6,
        "jui" => 7,
        "aou" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Converts the captures of a pattern embedding [`date`] into a date.
///
/// Two-digit numeric years are read as `20xx`. Returns `None` when the
/// captured day/month/year do not form a valid calendar date.
#[must_use]
pub fn date_from_captures(caps: &Captures<'_>) -> Option<NaiveDate> {
    if let (Some(day), Some(month), Some(year)) =
        (caps.name("day"), caps.name("month"), caps.name("year"))
    {
        let day = if day.as_str().eq_ignore_ascii_case("premier") {
            1
        } else {
            day.as_str().parse().ok()?
        };
        let month = month_number(month.as_str())?;
        let year = year.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let day = caps.name("nday")?.as_str().parse().ok()?;
    let month = caps.name("nmonth")?.as_str().parse().ok()?;
    let year = caps.name("nyear")?.as_str();
    let year: i32 = if year.len() == 2 {
        2000 + year.parse::<i32>().ok()?
    } else {
        year.parse().ok()?
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First valid date in `text`.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_RE
        .captures_iter(text)
        .find_map(|caps| date_from_captures(&caps))
}

/// Output form `dd/mm/yyyy`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
