use chrono::NaiveDate;

use petroforge_core::{
    Basin, CoreError, Frame, GeologicLayer, OperationalStatus, Operator, Record, Table, TableName,
    Value, Well, WellType,
};

fn well(code: &str) -> Well {
    Well {
        codigo_poco: code.to_string(),
        nome_poco: "Macaé-12".to_string(),
        tipo_poco: WellType::Offshore,
        localizacao: Basin::Campos,
        camada: GeologicLayer::PreSalt,
        profundidade_metros: 4_200,
        status_operacional: OperationalStatus::Active,
        data_perfuracao: NaiveDate::from_ymd_opt(2019, 3, 14).unwrap(),
        operadora: Operator::Petrobras,
    }
}

#[test]
fn duplicate_key_rejects_whole_chunk() {
    let mut table = Table::from_rows(vec![well("POCO_100")]).expect("first chunk");

    let err = table
        .append_chunk(vec![well("POCO_101"), well("POCO_100")])
        .expect_err("duplicate must be rejected");
    assert!(matches!(err, CoreError::DuplicateKey { table: "raw_pocos", .. }));
    assert_eq!(table.len(), 1);
    assert!(!table.contains_key("POCO_101"));

    let err = table
        .append_chunk(vec![well("POCO_200"), well("POCO_200")])
        .expect_err("duplicate within chunk must be rejected");
    assert!(matches!(err, CoreError::DuplicateKey { .. }));
    assert_eq!(table.len(), 1);
}

#[test]
fn frame_keeps_record_column_order() {
    let table = Table::from_rows(vec![well("POCO_100"), well("POCO_101")]).unwrap();
    let frame = table.to_frame();

    assert_eq!(frame.columns(), Well::COLUMNS);
    assert_eq!(frame.len(), 2);
    let types: Vec<&Value> = frame.column("tipo_poco").unwrap().collect();
    assert_eq!(types, vec![&Value::Int(1), &Value::Int(1)]);

    let decoded = Table::<Well>::from_frame(&frame).expect("decode");
    assert_eq!(decoded.rows(), table.rows());
    assert_eq!(<Well as Record>::TABLE, TableName::Wells);
    assert_eq!(Well::COLUMNS[0], TableName::Wells.key_column());
}

#[test]
fn decode_reports_missing_column_and_bad_cells() {
    let table = Table::from_rows(vec![well("POCO_100")]).unwrap();

    let mut frame = table.to_frame();
    assert!(frame.drop_column("operadora"));
    let err = frame.decode::<Well>().expect_err("missing column");
    assert!(matches!(err, CoreError::MissingColumn(ref column) if column == "operadora"));

    let mut frame = table.to_frame();
    frame
        .set_value(0, "profundidade_metros", Value::from("deep"))
        .unwrap();
    let err = frame.decode::<Well>().expect_err("type mismatch");
    assert!(matches!(err, CoreError::TypeMismatch { expected: "int", found: "text", .. }));

    let mut frame = table.to_frame();
    frame.set_value(0, "camada", Value::from("Sub-Sal")).unwrap();
    assert!(matches!(
        frame.decode::<Well>(),
        Err(CoreError::UnknownLabel { domain: "camada", .. })
    ));
}

#[test]
fn frame_rejects_misaligned_rows() {
    let mut frame = Frame::new(vec!["a".to_string(), "b".to_string()]);
    let err = frame.push_row(vec![Value::Int(1)]).expect_err("misaligned");
    assert!(matches!(err, CoreError::MisalignedRow { expected: 2, found: 1 }));
    assert!(frame.is_empty());
}

#[test]
fn table_names_round_trip_and_truncate_children_first() {
    for table in TableName::ALL {
        assert_eq!(TableName::parse(table.as_str()), Some(table));
    }
    assert_eq!(
        TableName::truncate_order(),
        [
            TableName::Incidents,
            TableName::Production,
            TableName::Equipment,
            TableName::Wells
        ]
    );
}
