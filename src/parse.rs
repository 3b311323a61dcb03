use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{preceded, tuple},
    IResult,
};

#[derive(Debug, PartialEq, Eq)]
pub struct AccentRow<'a> {
    pub headword: &'a str,
    pub katakana_reading: &'a str,
    pub pitch_numbers: Vec<&'a str>,
    pub frequency: Option<u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReadingRow<'a> {
    pub word: &'a str,
    pub syllables: Vec<&'a str>,
}

fn field(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '\t' || c == '\n')(input)
}

// A pitch number is digits, or several digit groups dash-joined for
// multi-part compounds ("1-0").
fn pitch_number(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('-'), digit1))(input)
}

fn pitch_numbers(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char(','), pitch_number)(input)
}

pub fn accent_row(input: &str) -> IResult<&str, AccentRow> {
    map(
        tuple((
            field,
            char('\t'),
            field,
            char('\t'),
            pitch_numbers,
            opt(preceded(char('\t'), map_res(digit1, str::parse))),
        )),
        |(headword, _, katakana_reading, _, pitch_numbers, frequency)| AccentRow {
            headword,
            katakana_reading,
            pitch_numbers,
            frequency,
        },
    )(input)
}

fn syllable(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == ' ' || c == '\t' || c == '\n')(input)
}

pub fn reading_row(input: &str) -> IResult<&str, ReadingRow> {
    map(
        tuple((field, char('\t'), separated_list1(char(' '), syllable))),
        |(word, _, syllables)| ReadingRow { word, syllables },
    )(input)
}
