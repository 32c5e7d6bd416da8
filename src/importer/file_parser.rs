// ==========================================
// 上传对账系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，仅第一个工作表) / CSV (.csv，分号优先，逗号回退)
// ==========================================

use crate::domain::upload::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ==========================================
// 表格格式（按扩展名判定）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
}

impl TableFormat {
    /// 根据扩展名判定格式（大小写不敏感）
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xls" => Ok(TableFormat::Excel),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            })),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn read_with_delimiter(bytes: &[u8], delimiter: u8) -> csv::Result<Vec<Vec<String>>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            rows.push(
                record
                    .iter()
                    .map(|v| Self::decode_field(v).trim_start().to_string())
                    .collect(),
            );
        }

        Ok(rows)
    }

    /// 单元格解码: UTF-8 优先，否则按 Latin-1 逐字节映射（Windows 导出的德语表格）
    fn decode_field(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// 分隔符误判: 首行只有一个单元格且其中含逗号
    fn looks_comma_delimited(rows: &[Vec<String>]) -> bool {
        rows.first()
            .map(|first| first.len() == 1 && first[0].contains(','))
            .unwrap_or(false)
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        // 先按分号解析
        match Self::read_with_delimiter(bytes, b';') {
            Ok(rows) if !Self::looks_comma_delimited(&rows) => {
                debug!(rows = rows.len(), "CSV 按分号解析完成");
                return Ok(RawTable::new(rows));
            }
            Ok(_) => debug!("首行为单个含逗号单元格，改用逗号分隔"),
            Err(e) => warn!(error = %e, "分号解析失败，改用逗号分隔"),
        }

        // 回退到逗号
        let rows = Self::read_with_delimiter(bytes, b',')?;
        debug!(rows = rows.len(), "CSV 按逗号解析完成");
        Ok(RawTable::new(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        // 按内容识别容器格式（.xls 扩展名下的 xlsx 也可打开）
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => {
                return Err(ImportError::ExcelParseError(
                    "Excel 文件无工作表".to_string(),
                ))
            }
        };

        // 使用区域不含前导空行/空列，补齐以保持行列偏移
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut row = vec![String::new(); col_offset];
            row.extend(data_row.iter().map(|cell| cell.to_string()));

            // 矩形区域的尾部空单元格不属于内容
            while row.last().map(|c| c.is_empty()).unwrap_or(false) {
                row.pop();
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), "Excel 第一个工作表解析完成");
        Ok(RawTable::new(rows))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        self.parse_file(file_path.as_ref())
    }

    /// 按文件头魔数识别: ZIP (xlsx) / OLE (xls)，其余按 CSV
    fn sniff_is_excel(bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0])
    }
}

impl FileParser for UniversalFileParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        if Self::sniff_is_excel(bytes) {
            ExcelParser.parse_bytes(bytes)
        } else {
            CsvParser.parse_bytes(bytes)
        }
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        match TableFormat::from_path(file_path)? {
            TableFormat::Csv => CsvParser.parse_file(file_path),
            TableFormat::Excel => ExcelParser.parse_file(file_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_semicolon_parse() {
        let file = csv_file("Publisher ID;SubID\nP1; S1\n");

        let table = UniversalFileParser.parse(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec!["P1".to_string(), "S1".to_string()]);
    }

    #[test]
    fn test_csv_comma_fallback() {
        let file = csv_file("Publisher ID,SubID,Timestamp\nP1,S1,01.02.2024\n");

        let table = UniversalFileParser.parse(file.path()).unwrap();

        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[1][2], "01.02.2024");
    }

    #[test]
    fn test_csv_semicolon_with_commas_in_cells_kept() {
        // 首行多列时不回退，即便单元格含逗号
        let file = csv_file("Adresse des Endkunden;SubID\nHauptstr. 1, Berlin;S1\n");

        let table = UniversalFileParser.parse(file.path()).unwrap();

        assert_eq!(table.rows()[1][0], "Hauptstr. 1, Berlin");
    }

    #[test]
    fn test_csv_ragged_rows_and_bom() {
        let file = csv_file("\u{feff}Banner\nPublisher ID;SubID;Timestamp\nP1\n");

        let table = UniversalFileParser.parse(file.path()).unwrap();

        assert_eq!(table.rows()[0], vec!["Banner".to_string()]);
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.rows()[2].len(), 1);
    }

    #[test]
    fn test_csv_windows_1252_header_decoded() {
        let mut bytes = b"Publisher ID;Vollst".to_vec();
        bytes.push(0xE4);
        bytes.extend_from_slice(b"ndiger Name des Endkunden;SubID\nP1;M\xFCller;S1\n");

        let table = CsvParser.parse_bytes(&bytes).unwrap();

        assert_eq!(table.rows()[0][1], "Vollständiger Name des Endkunden");
        assert_eq!(table.rows()[1], vec!["P1", "Müller", "S1"]);
    }

    #[test]
    fn test_csv_leading_space_trimmed_only() {
        let file = csv_file("a;  b  ;c\n");

        let table = UniversalFileParser.parse(file.path()).unwrap();

        assert_eq!(table.rows()[0][1], "b  ");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();

        let err = UniversalFileParser.parse(file.path()).unwrap_err();

        assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "txt"));
    }

    #[test]
    fn test_file_not_found() {
        let err = UniversalFileParser
            .parse("definitely_missing_upload.csv")
            .unwrap_err();

        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        assert_eq!(
            TableFormat::from_path(Path::new("UPLOAD.XLSX")).unwrap(),
            TableFormat::Excel
        );
        assert_eq!(
            TableFormat::from_path(Path::new("upload.Csv")).unwrap(),
            TableFormat::Csv
        );
    }

    #[test]
    fn test_excel_garbage_is_malformed() {
        let err = ExcelParser.parse_bytes(b"not a workbook").unwrap_err();
        assert!(err.is_malformed_table());
    }
}
