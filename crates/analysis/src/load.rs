use crate::error::AnalysisError;
use crate::model::{IssueKind, RecordIssue, Review};

/// Columns every review line must carry: id, date, author, text, rating.
pub const REQUIRED_COLUMNS: usize = 5;

/// Parse headerless review TSV.
///
/// Bad lines are returned as `DataFormat` issues alongside the good reviews
/// instead of aborting the load. Columns past the fifth are ignored. Lines
/// with no content are skipped; a line of empty tab-separated fields is not
/// blank and is reported.
pub fn parse_reviews(content: &str) -> (Vec<Review>, Vec<RecordIssue>) {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    let mut reviews = Vec::new();
    let mut issues = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut fallback_line = 0;

    loop {
        fallback_line += 1;
        let line = match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => record.position().map(|p| p.line() as usize).unwrap_or(fallback_line),
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(fallback_line);
                let err = AnalysisError::DataFormat { line, reason: e.to_string() };
                issues.push(RecordIssue::new(line, IssueKind::DataFormat, &err));
                continue;
            }
        };

        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        match parse_record(&record, line) {
            Ok(review) => reviews.push(review),
            Err(e) => issues.push(RecordIssue::new(line, IssueKind::DataFormat, &e)),
        }
    }

    (reviews, issues)
}

fn parse_record(record: &csv::StringRecord, line: usize) -> Result<Review, AnalysisError> {
    if record.len() < REQUIRED_COLUMNS {
        return Err(AnalysisError::DataFormat {
            line,
            reason: format!(
                "expected at least {REQUIRED_COLUMNS} columns, found {}",
                record.len()
            ),
        });
    }

    let field = |i: usize| record.get(i).unwrap_or("");
    let rating = parse_rating(field(4)).map_err(|reason| AnalysisError::DataFormat { line, reason })?;

    Ok(Review {
        line,
        id: field(0).trim().to_string(),
        date: field(1).trim().to_string(),
        author: field(2).trim().to_string(),
        text: field(3).to_string(),
        rating,
    })
}

/// Ratings are integers 1-5. Integral decimals such as `4.0` are accepted
/// since spreadsheet exports often write them that way.
pub fn parse_rating(value: &str) -> Result<u8, String> {
    let trimmed = value.trim();
    let parsed = match trimmed.parse::<i64>() {
        Ok(n) => n,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(format!("rating '{trimmed}' is not an integer")),
        },
    };

    if (1..=5).contains(&parsed) {
        Ok(parsed as u8)
    } else {
        Err(format!("rating '{trimmed}' out of range 1-5"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let input = "1\t2024-03-01\tuser1\tとても面白い\t5\n2\t2024-03-02\tuser2\t普通\t3\n";
        let (reviews, issues) = parse_reviews(input);
        assert!(issues.is_empty());
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, "1");
        assert_eq!(reviews[0].text, "とても面白い");
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].line, 1);
        assert_eq!(reviews[1].line, 2);
        assert_eq!(reviews[1].author, "user2");
    }

    #[test]
    fn skips_bad_rows_and_keeps_going() {
        let input = "\
1\t2024-03-01\tu\tgood\t4
2\t2024-03-01\tu\tmissing rating
3\t2024-03-01\tu\tword\tfive
4\t2024-03-01\tu\ttoo high\t6
5\t2024-03-01\tu\tlast\t1
";
        let (reviews, issues) = parse_reviews(input);
        let ids: Vec<_> = reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(reviews[1].line, 5);

        assert!(issues.iter().all(|i| i.kind == IssueKind::DataFormat));
        let lines: Vec<_> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(issues[0].message.contains("found 4"));
        assert!(issues[1].message.contains("not an integer"));
        assert!(issues[2].message.contains("out of range"));
    }

    #[test]
    fn empty_lines_skipped_but_tab_only_lines_reported() {
        let input = "   \n\t\t\t\t\n1\td\ta\tok\t4\n\n";
        let (reviews, issues) = parse_reviews(input);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].line, 3);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert!(issues[0].message.contains("not an integer"), "{}", issues[0].message);
    }

    #[test]
    fn quotes_are_literal() {
        let input = "1\td\ta\t\"引用\"付きの感想\t5\n";
        let (reviews, issues) = parse_reviews(input);
        assert!(issues.is_empty());
        assert_eq!(reviews[0].text, "\"引用\"付きの感想");
    }

    #[test]
    fn extra_columns_ignored_and_crlf_handled() {
        let input = "1\td\ta\ttext\t3\textra\r\n2\td\ta\tmore\t2\r\n";
        let (reviews, issues) = parse_reviews(input);
        assert!(issues.is_empty());
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, 3);
        assert_eq!(reviews[1].text, "more");
    }

    #[test]
    fn empty_text_is_still_a_review() {
        let (reviews, issues) = parse_reviews("1\td\ta\t\t3\n");
        assert!(issues.is_empty());
        assert_eq!(reviews[0].text, "");
    }

    #[test]
    fn rating_forms() {
        assert_eq!(parse_rating("5"), Ok(5));
        assert_eq!(parse_rating(" 1 "), Ok(1));
        assert_eq!(parse_rating("4.0"), Ok(4));
        assert!(parse_rating("4.5").is_err());
        assert!(parse_rating("0").is_err());
        assert!(parse_rating("").is_err());
        assert!(parse_rating("NaN").is_err());
    }
}
