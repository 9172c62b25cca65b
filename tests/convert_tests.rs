use std::io::{self, Read, Write};

use csv2sql::{
    ConvertStats, Converter, convert,
    error::{AppErrorKind, error_message}
};
use sqlparser::{dialect::MySqlDialect, parser::Parser};

fn convert_str(table: &str, csv: &str) -> String {
    let mut out = Vec::new();
    convert(table, csv.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_str(table: &str, csv: &str) -> (String, ConvertStats) {
    let mut out = Vec::new();
    let stats = Converter::new(table).run(csv.as_bytes(), &mut out).unwrap();
    (String::from_utf8(out).unwrap(), stats)
}

struct FailingReader {
    data: &'static [u8],
    pos:  usize
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Err(io::Error::other("disk on fire"));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct LimitedWriter {
    written: Vec<u8>,
    limit:   usize
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_people_scenario() {
    let sql = convert_str("people", "name,age\nAlice,30\nBob,25\n");
    assert_eq!(
        sql,
        "CREATE TABLE `people` (\n    `name` TEXT,\n    `age` TEXT\n);\n\
         INSERT INTO `people` VALUES\n(\"Alice\", \"30\"),\n(\"Bob\", \"25\");\n"
    );
}

#[test]
fn test_header_only() {
    let sql = convert_str("empty", "a,b\n");
    assert_eq!(sql, "CREATE TABLE `empty` (\n    `a` TEXT,\n    `b` TEXT\n);\n;\n");
    assert!(!sql.contains("INSERT"));
}

#[test]
fn test_header_without_trailing_newline() {
    let sql = convert_str("t", "only");
    assert_eq!(sql, "CREATE TABLE `t` (\n    `only` TEXT\n);\n;\n");
}

#[test]
fn test_embedded_comma_and_quotes() {
    let sql = convert_str("t", "name,age\n\"Smith, \"\"Jr.\"\"\",40\n");
    assert!(sql.contains(r#"("Smith, \"Jr.\"", "40")"#));
}

#[test]
fn test_embedded_newline_and_backslash() {
    let sql = convert_str("t", "v\n\"line1\nline2\"\nC:\\tmp\n");
    assert!(sql.contains(r#"("line1\nline2")"#));
    assert!(sql.contains(r#"("C:\\tmp")"#));
}

#[test]
fn test_crlf_line_endings() {
    let sql = convert_str("t", "a,b\r\n1,2\r\n3,4\r\n");
    assert_eq!(
        sql,
        "CREATE TABLE `t` (\n    `a` TEXT,\n    `b` TEXT\n);\n\
         INSERT INTO `t` VALUES\n(\"1\", \"2\"),\n(\"3\", \"4\");\n"
    );
}

#[test]
fn test_crlf_inside_quoted_field() {
    let sql = convert_str("t", "v\r\n\"a\r\nb\"\r\n");
    assert!(sql.contains(r#"("a\nb")"#));
    assert!(!sql.contains(r#"\r"#));
}

#[test]
fn test_lone_cr_inside_quoted_field_is_kept() {
    let sql = convert_str("t", "v\n\"a\rb\"\n");
    assert!(sql.contains(r#"("a\rb")"#));
}

#[test]
fn test_leading_bom_is_dropped_from_header() {
    let sql = convert_str("t", "\u{feff}name,age\nAlice,30\n");
    assert!(sql.starts_with("CREATE TABLE `t` (\n    `name` TEXT,\n    `age` TEXT\n);\n"));
}

#[test]
fn test_short_row_is_padded() {
    let (sql, stats) = run_str("t", "a,b,c\n1,2\n");
    assert!(sql.contains(r#"("1", "2", "")"#));
    assert_eq!(stats.padded_rows, 1);
    assert_eq!(stats.truncated_rows, 0);
}

#[test]
fn test_long_row_is_truncated() {
    let (sql, stats) = run_str("t", "a,b\n1,2,3,4\n");
    assert!(sql.contains(r#"("1", "2")"#));
    assert!(!sql.contains("\"3\""));
    assert_eq!(stats.truncated_rows, 1);
    assert_eq!(stats.padded_rows, 0);
}

#[test]
fn test_every_tuple_has_header_width() {
    let (sql, stats) = run_str("t", "a,b,c\n1\n1,2\n1,2,3\n1,2,3,4\n");
    let tuples: Vec<&str> = sql.lines().filter(|l| l.starts_with('(')).collect();
    assert_eq!(tuples.len(), 4);
    for tuple in tuples {
        assert_eq!(tuple.matches("\", \"").count(), 2, "{}", tuple);
    }
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.columns, 3);
}

#[test]
fn test_stats() {
    let (_, stats) = run_str("people", "name,age\nAlice,30\nBob,25\n");
    assert_eq!(stats.table, "people");
    assert_eq!(stats.columns, 2);
    assert_eq!(stats.rows, 2);
    assert!(stats.has_rows());
}

#[test]
fn test_stats_without_rows() {
    let (_, stats) = run_str("t", "a\n");
    assert_eq!(stats.rows, 0);
    assert!(!stats.has_rows());
}

#[test]
fn test_empty_table_name_is_not_rejected() {
    let sql = convert_str("", "a\n1\n");
    assert!(sql.starts_with("CREATE TABLE `` (\n"));
    assert!(sql.contains("INSERT INTO `` VALUES\n"));
}

#[test]
fn test_identifiers_are_not_escaped() {
    let sql = convert_str("we`ird", "co`l\nx\n");
    assert!(sql.contains("CREATE TABLE `we`ird` ("));
    assert!(sql.contains("    `co`l` TEXT"));
}

#[test]
fn test_output_is_deterministic() {
    let csv = "id,name\n1,a\n2,b\n";
    assert_eq!(convert_str("t", csv), convert_str("t", csv));
}

#[test]
fn test_unicode_passthrough() {
    let sql = convert_str("t", "name\nJosé 日本\n");
    assert!(sql.contains("(\"José 日本\")"));
}

#[test]
fn test_control_characters_escaped() {
    let sql = convert_str("t", "v\n\"a\tb\x01\"\n");
    assert!(sql.contains(r#"("a\tb\x01")"#));
}

#[test]
fn test_unassigned_code_point_escaped() {
    let sql = convert_str("t", "v\n\u{0378}\n");
    assert!(sql.contains(r#"("\u0378")"#));
}

#[test]
fn test_invalid_utf8_field() {
    let mut out = Vec::new();
    convert("t", &b"v\nab\xff\n"[..], &mut out).unwrap();
    assert!(out.ends_with(b"(\"ab\\xff\");\n"));
}

#[test]
fn test_empty_input_is_error() {
    let mut out = Vec::new();
    let err = convert("t", &b""[..], &mut out).unwrap_err();
    assert!(matches!(err.kind, AppErrorKind::BadRequest));
    assert!(error_message(&err).contains("no header record"));
    assert!(out.is_empty());
}

fn parse_failure(csv: &str) -> (String, String) {
    let mut out = Vec::new();
    let err = convert("t", csv.as_bytes(), &mut out).unwrap_err();
    assert!(matches!(err.kind, AppErrorKind::BadRequest));
    (error_message(&err), String::from_utf8(out).unwrap())
}

#[test]
fn test_bare_quote_in_unquoted_field() {
    let (message, _) = parse_failure("a,b\nx\"y,2\n");
    assert!(message.starts_with("CSV parse error at line 2, byte 5:"), "{}", message);
    assert!(message.contains("bare \""));
}

#[test]
fn test_text_after_closing_quote() {
    let (message, _) = parse_failure("a,b\n\"x\"y,2\n");
    assert!(message.starts_with("CSV parse error at line 2, byte 7:"), "{}", message);
    assert!(message.contains("extraneous or missing \""));
}

#[test]
fn test_unterminated_quoted_field() {
    let (message, _) = parse_failure("a,b\n\"x,y\n1,2\n");
    assert!(message.starts_with("CSV parse error at line 2, byte 4:"), "{}", message);
    assert!(message.contains("never closed"));
}

#[test]
fn test_bad_quote_in_header() {
    let (message, out) = parse_failure("na\"me\n1\n");
    assert!(message.contains("line 1, byte 2"), "{}", message);
    assert!(out.is_empty());
}

#[test]
fn test_rows_before_bad_quote_are_written() {
    let (_, out) = parse_failure("a\n1\n2\nx\"y\n3\n");
    assert!(out.starts_with("CREATE TABLE `t` (\n    `a` TEXT\n);\nINSERT INTO `t` VALUES\n"));
    assert!(out.contains(r#"("1"),"#));
    assert!(out.contains(r#"("2")"#));
    assert!(!out.contains(r#"("3")"#));
    assert!(!out.ends_with(";\n"));
}

#[test]
fn test_escaped_quotes_are_accepted() {
    let sql = convert_str("t", "a,b\n\"\"\"\",\"say \"\"hi\"\"\"\n");
    assert!(sql.contains(r#"("\"", "say \"hi\"")"#));
}

#[test]
fn test_read_failure_is_error() {
    let reader = FailingReader {
        data: b"a,b\n1,2\n",
        pos:  0
    };
    let mut out = Vec::new();
    let err = convert("t", reader, &mut out).unwrap_err();
    assert!(matches!(err.kind, AppErrorKind::Internal));
    assert!(error_message(&err).contains("disk on fire"));
}

#[test]
fn test_read_failure_before_header() {
    let reader = FailingReader {
        data: b"",
        pos:  0
    };
    let mut out = Vec::new();
    assert!(convert("t", reader, &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_write_failure_is_error() {
    let mut writer = LimitedWriter {
        written: Vec::new(),
        limit:   10
    };
    let err = convert("t", &b"a,b\n1,2\n"[..], &mut writer).unwrap_err();
    assert!(matches!(err.kind, AppErrorKind::Internal));
    assert!(error_message(&err).contains("pipe closed"));
}

#[test]
fn test_write_failure_leaves_partial_output() {
    let create = "CREATE TABLE `t` (\n    `a` TEXT\n);\n";
    let mut writer = LimitedWriter {
        written: Vec::new(),
        limit:   create.len()
    };
    assert!(convert("t", &b"a\n1\n2\n"[..], &mut writer).is_err());
    assert_eq!(writer.written, create.as_bytes());
}

#[test]
fn test_output_parses_as_mysql() {
    let sql = convert_str("people", "name,age\nAlice,30\nBob,25\n");
    let statements = Parser::parse_sql(&MySqlDialect {}, &sql).unwrap();
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_quoted_values_parse_as_mysql() {
    let sql = convert_str("t", "a,b\n\"say \"\"hi\"\"\",\"x, y\"\n");
    let statements = Parser::parse_sql(&MySqlDialect {}, &sql).unwrap();
    assert_eq!(statements.len(), 2);
}
