// ==========================================
// 上传对账系统 - 表格回写实现
// ==========================================
// 用途: 编辑后的表格覆盖写回原上传文件
// 格式: CSV 使用分号分隔；Excel 写入单个工作表 Sheet1，全部按文本写入
// ==========================================

use crate::domain::upload::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::TableFormat;
use crate::importer::table_importer_trait::TableWriter;
use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

// ==========================================
// CSV Writer
// ==========================================
pub struct CsvTableWriter;

impl TableWriter for CsvTableWriter {
    fn write_table(&self, file_path: &Path, table: &RawTable) -> ImportResult<()> {
        let write_err = |e: &dyn std::fmt::Display| {
            ImportError::FileWriteError(format!("{}: {}", file_path.display(), e))
        };

        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(file_path)
            .map_err(|e| write_err(&e))?;

        for row in table.rows() {
            writer.write_record(row).map_err(|e| write_err(&e))?;
        }
        writer.flush().map_err(|e| write_err(&e))?;

        debug!(rows = table.len(), path = %file_path.display(), "CSV 写入完成");
        Ok(())
    }
}

// ==========================================
// Excel Writer
// ==========================================
pub struct ExcelTableWriter;

impl TableWriter for ExcelTableWriter {
    fn write_table(&self, file_path: &Path, table: &RawTable) -> ImportResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1")?;

        for (row_idx, row) in table.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| {
                ImportError::FileWriteError(format!("行号超出 Excel 上限: {}", row_idx))
            })?;

            for (col_idx, cell) in row.iter().enumerate() {
                // 空单元格不写，读取时按空串还原
                if cell.is_empty() {
                    continue;
                }
                let col_num = u16::try_from(col_idx).map_err(|_| {
                    ImportError::FileWriteError(format!("列号超出 Excel 上限: {}", col_idx))
                })?;
                worksheet.write_string(row_num, col_num, cell)?;
            }
        }

        workbook.save(file_path)?;

        debug!(rows = table.len(), path = %file_path.display(), "Excel 写入完成");
        Ok(())
    }
}

// ==========================================
// 通用回写（根据扩展名自动选择）
// ==========================================
pub struct UniversalTableWriter;

impl TableWriter for UniversalTableWriter {
    fn write_table(&self, file_path: &Path, table: &RawTable) -> ImportResult<()> {
        match TableFormat::from_path(file_path)? {
            TableFormat::Csv => CsvTableWriter.write_table(file_path, table),
            TableFormat::Excel => ExcelTableWriter.write_table(file_path, table),
        }
    }
}
