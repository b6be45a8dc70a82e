// CSV export

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use storelens_analysis::{AnalysisError, Tabular};

use crate::encoding::{encode, OutputEncoding};

/// Serialize records to CSV bytes in the target encoding.
///
/// The header row comes from [`Tabular::HEADERS`], so an empty table still
/// gets one.
pub fn render_records<T: Tabular>(records: &[T], encoding: OutputEncoding) -> Result<Vec<u8>, AnalysisError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(T::HEADERS)
        .map_err(|e| AnalysisError::Output(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AnalysisError::Output(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::Output(e.to_string()))?;
    // csv only ever writes UTF-8 from &str fields
    let text = String::from_utf8(bytes).map_err(|e| AnalysisError::Output(e.to_string()))?;
    encode(&text, encoding)
}

/// Render and write records in one step.
pub fn write_records<T: Tabular>(path: &Path, records: &[T], encoding: OutputEncoding) -> Result<(), AnalysisError> {
    let bytes = render_records(records, encoding)?;
    write_atomic(path, &bytes)
}

/// Write bytes to `path` through a sibling temp file, then rename into place.
///
/// Missing parent directories are created. On failure the destination is
/// left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AnalysisError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AnalysisError::Output(format!("cannot create directory {}: {e}", parent.display()))
        })?;
    }

    let tmp_path = temp_path(path);
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(AnalysisError::Output(format!("cannot write {}: {e}", tmp_path.display())));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        AnalysisError::Output(format!("cannot move output into {}: {e}", path.display()))
    })?;

    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storelens_analysis::{CommentRecord, SummaryRecord};

    fn summary(sub: &str, count: usize, avg: &str, sat: &str) -> SummaryRecord {
        SummaryRecord {
            category: "ゲームメカニクス".into(),
            subcategory: sub.into(),
            comment_count: count,
            average_rating: avg.into(),
            satisfaction_score: sat.into(),
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let records = vec![summary("コア", 2, "4.5", "90.0"), summary("total", 2, "4.5", "90.0")];
        let bytes = render_records(&records, OutputEncoding::Utf8).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "カテゴリ,サブカテゴリ,コメント件数,平均評価,ユーザー満足度スコア");
        assert_eq!(lines[1], "ゲームメカニクス,コア,2,4.5,90.0");
        assert_eq!(lines[2], "ゲームメカニクス,total,2,4.5,90.0");
    }

    #[test]
    fn empty_table_still_has_header() {
        let bytes = render_records::<CommentRecord>(&[], OutputEncoding::Utf8).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().trim_end(), "カテゴリ,サブカテゴリ,評価,コメント");
    }

    #[test]
    fn empty_sentinel_renders_as_empty_cell() {
        let bytes = render_records(&[summary("空", 0, "", "")], OutputEncoding::Utf8).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().nth(1), Some("ゲームメカニクス,空,0,,"));
    }

    #[test]
    fn comment_text_with_commas_and_newlines_is_quoted() {
        let records = vec![CommentRecord {
            category: "c".into(),
            subcategory: "s".into(),
            rating: 3,
            text: "楽しい,けど\n重い".into(),
        }];
        let bytes = render_records(&records, OutputEncoding::Utf8).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[3], "楽しい,けど\n重い");
    }

    #[test]
    fn shift_jis_output() {
        let bytes = render_records(&[summary("コア", 1, "5.0", "100.0")], OutputEncoding::ShiftJis).unwrap();
        assert!(String::from_utf8(bytes.clone()).is_err());
        let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(&bytes);
        assert!(!had_errors);
        assert!(text.contains("ゲームメカニクス,コア,1,5.0,100.0"));
    }

    #[test]
    fn atomic_write_creates_dirs_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/nested/summary.csv");
        write_records(&path, &[summary("コア", 1, "5.0", "100.0")], OutputEncoding::Utf8).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn unencodable_output_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(&path, "previous").unwrap();

        let err = write_records(&path, &[summary("😀", 1, "5.0", "100.0")], OutputEncoding::ShiftJis).unwrap_err();
        assert!(matches!(err, AnalysisError::Output(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn unwritable_target_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(matches!(err, AnalysisError::Output(_)));
        assert!(path.is_dir());
    }

    #[test]
    fn temp_path_is_sibling() {
        assert_eq!(temp_path(Path::new("out/summary.csv")), PathBuf::from("out/summary.csv.tmp"));
    }
}
