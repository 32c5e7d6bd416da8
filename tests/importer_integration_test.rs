// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: 文件读写往返、表头定位、行投影
// ==========================================


use tempfile::TempDir;
use test_helpers::{write_file, write_xlsx, UPLOAD_HEADER};
use upload_reconcile::importer::{
    HeaderLocator, ImportError, RowProjector, TableWriter, UniversalFileParser,
    UniversalTableWriter,
};
use upload_reconcile::{logging, CanonicalField, RawTable};

#[test]
fn test_csv_reread_is_idempotent() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let original = write_file(
        dir.path(),
        "upload.csv",
        &format!("Opt-out Export\n{}\nP1;Max;;;;20.03.2024;S1;T1\n", UPLOAD_HEADER),
    );

    let first = UniversalFileParser.parse(&original).unwrap();
    assert_eq!(UniversalFileParser.parse(&original).unwrap(), first);

    let copy = dir.path().join("copy.csv");
    UniversalTableWriter.write_table(&copy, &first).unwrap();
    let second = UniversalFileParser.parse(&copy).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.len(), 3);
}

#[test]
fn test_xlsx_round_trip() {
    let dir = TempDir::new().unwrap();
    let table = RawTable::from(vec![
        vec!["Publisher ID", "SubID", "Ordertoken/OrderID"],
        vec!["P1", "S1", "T1"],
        vec!["P2", "", "T2"],
    ]);

    let path = write_xlsx(dir.path(), "upload.xlsx", &table);
    let read_back = UniversalFileParser.parse(&path).unwrap();

    assert_eq!(read_back, table);
}

#[test]
fn test_trailing_empty_cell_round_trip() {
    let dir = TempDir::new().unwrap();
    let table = RawTable::from(vec![vec!["Publisher ID", "SubID"], vec!["P2", ""]]);

    // CSV 保留行尾空单元格
    let csv_path = dir.path().join("upload.csv");
    UniversalTableWriter.write_table(&csv_path, &table).unwrap();
    assert_eq!(UniversalFileParser.parse(&csv_path).unwrap(), table);

    // Excel 不存储空单元格，读回时行尾空单元格被裁掉
    let xlsx_path = write_xlsx(dir.path(), "upload.xlsx", &table);
    let read_back = UniversalFileParser.parse(&xlsx_path).unwrap();
    assert_eq!(read_back.row(0), table.row(0));
    assert_eq!(read_back.row(1), Some(&["P2".to_string()][..]));
}

#[test]
fn test_header_found_after_two_noise_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "upload.csv",
        &format!(
            "Publisher Opt-out Liste\nStand;März 2024\n{}\nP1;A;B;C;D;20.03.2024;S1;T1\nP2;A;B;C;D;21.03.2024;S2;T2\n",
            UPLOAD_HEADER
        ),
    );

    let table = UniversalFileParser.parse(&path).unwrap();
    let header_index = HeaderLocator::for_canonical_fields().locate(&table);
    let records = RowProjector.project(&table, header_index);

    assert_eq!(header_index, 2);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].field(CanonicalField::OrderToken), "T2");
    assert_eq!(records[0].row_number, 3);
}

#[test]
fn test_records_keyed_only_by_non_empty_headers() {
    let table = RawTable::from(vec![
        vec!["SubID", "", "Timestamp", "  "],
        vec!["S1", "ignored", "01.01.2024"],
        vec![],
        vec!["S3", "x", "", "y"],
    ]);

    let records = RowProjector.project(&table, 0);

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.headers().collect::<Vec<_>>(), vec!["SubID", "Timestamp"]);
    }
    assert_eq!(records[1].field(CanonicalField::SubId), "");
}

#[test]
fn test_comma_delimited_upload() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "upload.csv", "SubID,Ordertoken/OrderID\nS1,T1\n");

    let table = UniversalFileParser.parse(&path).unwrap();

    assert_eq!(table.row(1), Some(&["S1".to_string(), "T1".to_string()][..]));
}

#[test]
fn test_unsupported_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "upload.txt", "SubID\nS1\n");

    let err = UniversalFileParser.parse(&path).unwrap_err();

    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
