use chrono::{NaiveDate, Weekday};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, one_of, space1},
    combinator::{all_consuming, map_res, opt, recognize, rest},
    sequence::{pair, preceded, separated_pair, tuple},
    IResult,
};

use crate::cmds::Cmd;
use crate::config::{parse_iso_date, Holiday};
use crate::error::{Error, ErrorKind, Result};
use crate::theme::ColorToken;

pub type ActionResult = Result<Cmd>;

pub enum Action {
    Arg(fn(&str) -> ActionResult),
    NoArg(fn() -> Cmd),
    Repeatable(fn(i32) -> Cmd),
}

fn unknown(line: &str) -> Error {
    Error::new(ErrorKind::UnknownCommand, &format!("'{}'", line))
}

fn usage(name: &str, hint: &str) -> Error {
    Error::new(ErrorKind::UnknownCommand, &format!("usage: {} {}", name, hint))
}

fn command_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic())(input)
}

/// `[count]name[ argument]`
fn command_line(input: &str) -> IResult<&str, (Option<i32>, &str, Option<&str>)> {
    all_consuming(tuple((
        opt(map_res(digit1, |s: &str| s.parse::<i32>())),
        command_name,
        opt(preceded(space1, rest)),
    )))(input)
}

fn year_month(input: &str) -> IResult<&str, (i32, u32)> {
    all_consuming(separated_pair(
        map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
            s.parse::<i32>()
        }),
        one_of("-/ "),
        map_res(digit1, |s: &str| s.parse::<u32>()),
    ))(input)
}

fn date_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit() || c == '-')(input)
}

fn date_pair(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(date_token, alt((tag(".."), space1)), date_token))(input)
}

/// `2024-03`, `2024/3` or `2024 3`. The month is not range checked here.
pub fn parse_year_month(arg: &str) -> Result<(i32, u32)> {
    let (_, ym) = year_month(arg.trim()).map_err(|_| {
        Error::new(
            ErrorKind::InvalidDateFormat,
            &format!("'{}' is not a YYYY-MM month", arg),
        )
    })?;
    Ok(ym)
}

fn parse_goto(arg: &str) -> ActionResult {
    let (year, month) = parse_year_month(arg)?;
    Ok(Cmd::Goto(year, month))
}

fn parse_range(arg: &str) -> ActionResult {
    let (_, (start, end)) = date_pair(arg).map_err(|_| {
        Error::new(
            ErrorKind::InvalidDateFormat,
            &format!("'{}' is not a range like 2024-03-01..2024-03-09", arg),
        )
    })?;
    Ok(Cmd::SelectRange(parse_iso_date(start)?, parse_iso_date(end)?))
}

fn parse_switch(arg: &str) -> Result<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(Error::new(
            ErrorKind::InvalidConfig,
            &format!("expected 'on' or 'off', got '{}'", arg),
        )),
    }
}

fn parse_number<N: std::str::FromStr>(arg: &str) -> Result<N> {
    arg.parse().map_err(|_| {
        Error::new(
            ErrorKind::InvalidConfig,
            &format!("'{}' is not a number", arg),
        )
    })
}

fn is_none(color: &str) -> bool {
    color.eq_ignore_ascii_case("none")
}

/// `Sunday red` or `Sunday none`
fn parse_day_color(arg: &str) -> ActionResult {
    let (day, color) = arg
        .split_once(|c: char| c.is_whitespace())
        .ok_or_else(|| usage("color", "<weekday> <color|none>"))?;
    let weekday = day.parse::<Weekday>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidConfig,
            &format!("'{}' is not a weekday name", day),
        )
    })?;
    let color = color.trim();
    Ok(Cmd::DayColor(
        weekday,
        (!is_none(color)).then(|| ColorToken::from(color)),
    ))
}

/// `2024-12-25 red Christmas Day` or `2024-12-25 none`
fn parse_holiday(arg: &str) -> ActionResult {
    let mut parts = arg.splitn(3, |c: char| c.is_whitespace());
    let (date, color) = match (parts.next(), parts.next()) {
        (Some(date), Some(color)) => (parse_iso_date(date)?, color),
        _ => return Err(usage("holiday", "<YYYY-MM-DD> <color|none> [label]")),
    };
    let label = parts
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned);

    let holiday = (!is_none(color)).then(|| Holiday {
        color: color.into(),
        label,
    });
    Ok(Cmd::Holiday(date, holiday))
}

fn parse_date_cmd(arg: &str, cmd: fn(NaiveDate) -> Cmd) -> ActionResult {
    Ok(cmd(parse_iso_date(arg)?))
}

const COMMANDS: &[(&str, Action)] = &[
    ("next", Action::Repeatable(Cmd::ShiftMonths)),
    ("n", Action::Repeatable(Cmd::ShiftMonths)),
    ("prev", Action::Repeatable(|n| Cmd::ShiftMonths(-n))),
    ("p", Action::Repeatable(|n| Cmd::ShiftMonths(-n))),
    ("nexty", Action::Repeatable(Cmd::ShiftYears)),
    ("prevy", Action::Repeatable(|n| Cmd::ShiftYears(-n))),
    ("nextr", Action::Repeatable(Cmd::ShiftYearRange)),
    ("prevr", Action::Repeatable(|n| Cmd::ShiftYearRange(-n))),
    ("today", Action::NoArg(|| Cmd::Today)),
    ("t", Action::NoArg(|| Cmd::Today)),
    ("goto", Action::Arg(parse_goto)),
    ("lang", Action::Arg(|arg| Ok(Cmd::Language(arg.to_owned())))),
    ("week", Action::Arg(|arg| Ok(Cmd::WeekStart(arg.parse()?)))),
    (
        "weeknum",
        Action::Arg(|arg| Ok(Cmd::WeekNumbers(parse_switch(arg)?))),
    ),
    ("months", Action::Arg(|arg| Ok(Cmd::Months(parse_number(arg)?)))),
    ("theme", Action::Arg(|arg| Ok(Cmd::Theme(arg.to_owned())))),
    (
        "todaycolor",
        Action::Arg(|arg| Ok(Cmd::TodayMarker(arg.parse()?))),
    ),
    ("mode", Action::Arg(|arg| Ok(Cmd::SelectMode(arg.parse()?)))),
    ("select", Action::Arg(|arg| parse_date_cmd(arg, Cmd::Select))),
    ("click", Action::Arg(|arg| parse_date_cmd(arg, Cmd::Click))),
    ("range", Action::Arg(parse_range)),
    ("clear", Action::NoArg(|| Cmd::ClearSelection)),
    ("color", Action::Arg(parse_day_color)),
    ("holiday", Action::Arg(parse_holiday)),
    ("year", Action::NoArg(|| Cmd::OpenMonthPicker)),
    ("years", Action::NoArg(|| Cmd::OpenYearPicker)),
    ("pick", Action::Arg(|arg| Ok(Cmd::Pick(parse_number(arg)?)))),
    ("q", Action::NoArg(|| Cmd::Exit)),
    ("quit", Action::NoArg(|| Cmd::Exit)),
];

/// Names of all known commands.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _)| *name)
}

/// Parse one command line such as `3next`, `goto 2024-03` or `lang ja`.
/// An empty line is a no-op.
pub fn parse(line: &str) -> Result<Cmd> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Cmd::Noop);
    }

    let (_, (count, name, arg)) = command_line(line).map_err(|_| unknown(line))?;
    let action = COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, act)| act)
        .ok_or_else(|| unknown(line))?;

    match (action, count, arg.map(str::trim)) {
        (Action::Repeatable(act), count, None) => Ok(act(count.unwrap_or(1))),
        (Action::NoArg(act), None, None) => Ok(act()),
        (Action::Arg(act), None, Some(arg)) if !arg.is_empty() => act(arg),
        (Action::Arg(_), _, _) => Err(usage(name, "<argument>")),
        _ => Err(usage(name, "takes no argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TodayMarker;
    use crate::grid::WeekStart;
    use crate::selection::SelectMode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn repeat_counts() {
        assert_eq!(parse("next").unwrap(), Cmd::ShiftMonths(1));
        assert_eq!(parse("3next").unwrap(), Cmd::ShiftMonths(3));
        assert_eq!(parse("12p").unwrap(), Cmd::ShiftMonths(-12));
        assert_eq!(parse("2prevy").unwrap(), Cmd::ShiftYears(-2));
        assert_eq!(parse("nextr").unwrap(), Cmd::ShiftYearRange(1));
    }

    #[test]
    fn arguments() {
        assert_eq!(parse("goto 2024-03").unwrap(), Cmd::Goto(2024, 3));
        assert_eq!(parse("goto 2024 13").unwrap(), Cmd::Goto(2024, 13));
        assert_eq!(parse(" lang ja ").unwrap(), Cmd::Language("ja".to_owned()));
        assert_eq!(parse("week monday").unwrap(), Cmd::WeekStart(WeekStart::Monday));
        assert_eq!(parse("weeknum on").unwrap(), Cmd::WeekNumbers(true));
        assert_eq!(parse("months 3").unwrap(), Cmd::Months(3));
        assert_eq!(parse("todaycolor none").unwrap(), Cmd::TodayMarker(TodayMarker::Hidden));
        assert_eq!(parse("mode range").unwrap(), Cmd::SelectMode(SelectMode::Range));
        assert_eq!(parse("pick 7").unwrap(), Cmd::Pick(7));
    }

    #[test]
    fn dates_and_ranges() {
        assert_eq!(
            parse("select 2024-03-05").unwrap(),
            Cmd::Select(date(2024, 3, 5))
        );
        assert_eq!(
            parse("range 2024-03-01..2024-03-09").unwrap(),
            Cmd::SelectRange(date(2024, 3, 1), date(2024, 3, 9))
        );
        assert_eq!(
            parse("range 2024-03-01 2024-03-09").unwrap(),
            Cmd::SelectRange(date(2024, 3, 1), date(2024, 3, 9))
        );
        assert!(parse("select 05.03.2024").unwrap_err().is_invalid_date_format());
        assert!(parse("goto March").unwrap_err().is_invalid_date_format());
    }

    #[test]
    fn styling_commands() {
        assert_eq!(
            parse("color sunday red").unwrap(),
            Cmd::DayColor(Weekday::Sun, Some("red".into()))
        );
        assert_eq!(
            parse("color Sun none").unwrap(),
            Cmd::DayColor(Weekday::Sun, None)
        );
        assert_eq!(
            parse("holiday 2024-12-25 red Christmas Day").unwrap(),
            Cmd::Holiday(
                date(2024, 12, 25),
                Some(Holiday {
                    color: "red".into(),
                    label: Some("Christmas Day".to_owned())
                })
            )
        );
        assert_eq!(
            parse("holiday 2024-12-25 none").unwrap(),
            Cmd::Holiday(date(2024, 12, 25), None)
        );
        assert!(parse("color Funday red").unwrap_err().is_invalid_config());
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse("   ").unwrap(), Cmd::Noop);
        assert!(matches!(
            parse("frobnicate").unwrap_err().kind,
            ErrorKind::UnknownCommand
        ));
        assert!(matches!(
            parse("3goto 2024-01").unwrap_err().kind,
            ErrorKind::UnknownCommand
        ));
        assert!(matches!(parse("lang").unwrap_err().kind, ErrorKind::UnknownCommand));
        assert!(matches!(parse("next 3").unwrap_err().kind, ErrorKind::UnknownCommand));
        assert!(parse("week friday").unwrap_err().is_invalid_config());
        assert!(command_names().any(|n| n == "goto"));
    }
}
