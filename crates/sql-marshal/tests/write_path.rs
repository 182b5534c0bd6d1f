//! Binding canonical records into statements, per dialect.

mod common;

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{FakeCursor, FakeExecutor, Param};
use sql_marshal::core::registry::builtin;
use sql_marshal::core::traits::ResultCursor;
use sql_marshal::core::types;
use sql_marshal::dialect::DecimalSpec;
use sql_marshal::{
    ColumnDescriptor, ColumnRemap, ColumnTypeBinding, DialectKind, Field, FieldType,
    FieldsValidator, LogicalType, MarshalError, ReaderOptions, Record, RecordMarshaller, Schema,
    SchemaReader, SqlValue, TimezonePolicy, Value,
};

fn record(fields: Vec<Field>, values: Vec<Value>) -> Record {
    Record::from_values(Arc::new(Schema::new(fields).unwrap()), values).unwrap()
}

fn write(kind: DialectKind, record: &Record, columns: &[ColumnDescriptor]) -> sql_marshal::Result<FakeExecutor> {
    let dialect = builtin(kind, ReaderOptions::default());
    let binding = ColumnTypeBinding::resolve(record.schema(), columns, &ColumnRemap::default())?;
    let mut exec = FakeExecutor::default();
    dialect.write_row(&mut exec, record, &binding)?;
    Ok(exec)
}

fn text(s: &str) -> SqlValue<'static> {
    SqlValue::Text(Cow::Owned(s.to_string()))
}

#[test]
fn standard_columns_round_trip_on_every_dialect() {
    let columns = vec![
        ColumnDescriptor::new("id", types::INTEGER, "INTEGER").not_null(),
        ColumnDescriptor::new("name", types::VARCHAR, "VARCHAR"),
        ColumnDescriptor::new("amount", types::DECIMAL, "DECIMAL").with_precision(10, 2),
        ColumnDescriptor::new("born", types::DATE, "DATE"),
        ColumnDescriptor::new("seen", types::TIMESTAMP, "DATETIME2"),
        ColumnDescriptor::new("photo", types::VARBINARY, "VARBINARY"),
    ];
    let seen = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_micro_opt(23, 59, 58, 250_000)
        .unwrap();
    let row = vec![
        SqlValue::I32(42),
        text("Ada"),
        SqlValue::Decimal(Decimal::from_str("12.50").unwrap()),
        SqlValue::Date(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()),
        SqlValue::DateTime(seen),
        SqlValue::Bytes(Cow::Owned(vec![0xde, 0xad])),
    ];

    for kind in DialectKind::ALL {
        let dialect = builtin(kind, ReaderOptions::default());
        let mut cursor = FakeCursor::new(columns.clone(), vec![row.clone()]);
        let schema = Arc::new(dialect.infer_schema(cursor.columns()).unwrap());
        assert!(dialect.validate(&schema, &columns).is_empty(), "{}", kind);

        cursor.advance().unwrap();
        let record = dialect.read_row(&mut cursor, &schema).unwrap();
        let binding = ColumnTypeBinding::resolve(&schema, &columns, &ColumnRemap::default()).unwrap();
        let mut exec = FakeExecutor::default();
        dialect.write_row(&mut exec, &record, &binding).unwrap();

        let bound: Vec<SqlValue<'static>> = exec.current.into_iter().map(|p| p.unwrap().0).collect();
        assert_eq!(bound, row, "{}", kind);
    }
}

/// Read one row with the inferred (or given) schema, check that schema against
/// the same columns, then bind the record back.
fn round_trip(
    kind: DialectKind,
    options: ReaderOptions,
    columns: &[ColumnDescriptor],
    row: Vec<SqlValue<'static>>,
    schema: Option<Schema>,
) -> Vec<Param> {
    let dialect = builtin(kind, options);
    let mut cursor = FakeCursor::new(columns.to_vec(), vec![row]);
    let schema = Arc::new(match schema {
        Some(schema) => schema,
        None => dialect.infer_schema(columns).unwrap(),
    });
    let problems = dialect.validate(&schema, columns);
    assert!(problems.is_empty(), "{}: {:?}", kind, problems);

    cursor.advance().unwrap();
    let record = dialect.read_row(&mut cursor, &schema).unwrap();
    let binding = ColumnTypeBinding::resolve(&schema, columns, &ColumnRemap::default()).unwrap();
    let mut exec = FakeExecutor::default();
    dialect.write_row(&mut exec, &record, &binding).unwrap();
    exec.current.into_iter().map(|p| p.unwrap()).collect()
}

/// WKT or interval text, upper-cased with whitespace collapsed.
fn canonical_text(value: &SqlValue<'_>) -> String {
    let SqlValue::Text(s) = value else {
        panic!("expected text, got {:?}", value);
    };
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" (", "(")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",")
        .to_ascii_uppercase()
}

fn offset_ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

#[test]
fn sqlserver_vendor_types_round_trip() {
    let columns = [
        ColumnDescriptor::new("shape", -157, "geometry"),
        ColumnDescriptor::new("opens", types::TIME, "time"),
        ColumnDescriptor::new("seen", -155, "datetimeoffset"),
        ColumnDescriptor::new("tag", -156, "sql_variant"),
    ];
    let wkb = vec![0x01, 0x01, 0x00, 0x00, 0x00];
    let opens = NaiveTime::from_hms_micro_opt(9, 30, 0, 120_000).unwrap();
    let seen = offset_ts("2024-05-01T10:00:00.123456+02:00");
    let row = vec![
        SqlValue::bytes_owned(wkb.clone()),
        SqlValue::Time(opens),
        SqlValue::DateTimeOffset(seen),
        text("blue"),
    ];
    let bound = round_trip(DialectKind::SqlServer, ReaderOptions::default(), &columns, row, None);

    assert_eq!(bound[0], (SqlValue::bytes_owned(wkb), None));
    match &bound[1] {
        (SqlValue::Text(s), Some(code)) => {
            assert_eq!(*code, types::VARCHAR);
            assert_eq!(s, "09:30:00.1200000");
            assert_eq!(NaiveTime::parse_from_str(s, "%H:%M:%S%.f").unwrap(), opens);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(bound[2], (SqlValue::DateTimeOffset(seen), Some(-155)));
    assert_eq!(bound[3], (text("blue"), None));
}

#[test]
fn spatial_and_interval_text_round_trip_after_canonicalisation() {
    let shape = [ColumnDescriptor::new("shape", -157, "geometry")];
    let as_text = Schema::new(vec![Field::new("shape", FieldType::String)]).unwrap();
    let bound = round_trip(
        DialectKind::SqlServer,
        ReaderOptions::default(),
        &shape,
        vec![text("POINT (30 10)")],
        Some(as_text),
    );
    assert_eq!(bound[0].1, None);
    assert_eq!(canonical_text(&bound[0].0), canonical_text(&text("point(30  10)")));

    let lease = [ColumnDescriptor::new("LEASE", -104, "INTERVALDS")];
    let bound = round_trip(
        DialectKind::Oracle,
        ReaderOptions::default(),
        &lease,
        vec![text("+02 03:04:05.000000")],
        None,
    );
    assert_eq!(bound[0].1, Some(-104));
    assert_eq!(canonical_text(&bound[0].0), canonical_text(&text(" +02  03:04:05.000000")));
}

#[test]
fn oracle_vendor_types_round_trip() {
    let columns = [
        ColumnDescriptor::new("ZONED", -101, "TIMESTAMP WITH TIME ZONE"),
        ColumnDescriptor::new("RATIO", 101, "BINARY_DOUBLE"),
        ColumnDescriptor::new("RID", types::ROWID, "ROWID"),
        ColumnDescriptor::new("NOTES", types::LONGVARCHAR, "LONG"),
    ];
    let zoned = offset_ts("2023-11-05T01:30:00.5-05:00");
    let row = vec![
        SqlValue::DateTimeOffset(zoned),
        SqlValue::F64(0.125),
        text("AAAR3sAAEAAAACXAAA"),
        text("long text"),
    ];
    let bound = round_trip(DialectKind::Oracle, ReaderOptions::default(), &columns, row, None);
    assert_eq!(
        bound,
        vec![
            (SqlValue::DateTimeOffset(zoned), Some(-101)),
            (SqlValue::F64(0.125), None),
            (text("AAAR3sAAEAAAACXAAA"), None),
            (text("long text"), None),
        ]
    );
}

#[test]
fn postgres_vendor_types_round_trip() {
    let options = ReaderOptions {
        timezone_policy: TimezonePolicy::NormalizeUtc,
        default_decimal: Some(DecimalSpec { precision: 38, scale: 4 }),
        ..ReaderOptions::default()
    };
    let columns = [
        ColumnDescriptor::new("id", types::OTHER, "uuid"),
        ColumnDescriptor::new("seen", types::TIMESTAMP, "timestamptz"),
        ColumnDescriptor::new("amount", types::NUMERIC, "numeric").with_precision(0, 0),
        ColumnDescriptor::new("tags", types::ARRAY, "_text"),
    ];
    let id = Uuid::parse_str("6f1c2b9e-4a7d-4e15-9c1e-2d3b4a5c6d7e").unwrap();
    let seen = offset_ts("2024-03-10T02:30:00.000001+09:00");
    let row = vec![
        SqlValue::Uuid(id),
        SqlValue::DateTimeOffset(seen),
        SqlValue::Decimal(Decimal::from_str("12.5").unwrap()),
        text("{a,b}"),
    ];
    let bound = round_trip(DialectKind::Postgres, options, &columns, row, None);

    assert_eq!(bound[0], (text(&id.hyphenated().to_string()), Some(types::OTHER)));
    match &bound[1] {
        (SqlValue::DateTimeOffset(dt), Some(code)) => {
            assert_eq!(*code, types::TIMESTAMP_WITH_TIMEZONE);
            assert_eq!(dt.with_timezone(&Utc), seen.with_timezone(&Utc));
            assert_eq!(dt.offset().local_minus_utc(), 0);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &bound[2] {
        (SqlValue::Decimal(d), Some(code)) => {
            assert_eq!(*code, types::NUMERIC);
            assert_eq!(d.to_string(), "12.5000");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(bound[3], (text("{a,b}"), Some(types::OTHER)));
}

#[test]
fn mysql_vendor_types_round_trip() {
    let columns = [
        ColumnDescriptor::new("built", types::DATE, "YEAR(4)"),
        ColumnDescriptor::new("flags", types::BIT, "BIT").with_precision(12, 0),
        ColumnDescriptor::new("total", types::BIGINT, "BIGINT UNSIGNED").unsigned(),
        ColumnDescriptor::new("hits", types::INTEGER, "INT UNSIGNED").unsigned(),
        ColumnDescriptor::new("doc", types::LONGVARCHAR, "JSON"),
    ];
    let total = Decimal::from_str("18446744073709551615").unwrap();
    let row = vec![
        SqlValue::Date(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()),
        SqlValue::I64(0x0a05),
        SqlValue::Decimal(total),
        SqlValue::I64(4_000_000_000),
        text(r#"{"k": [1, 2]}"#),
    ];
    let bound = round_trip(DialectKind::Mysql, ReaderOptions::default(), &columns, row, None);
    assert_eq!(
        bound,
        vec![
            (SqlValue::I32(1999), Some(types::INTEGER)),
            (SqlValue::bytes_owned(vec![0x0a, 0x05]), None),
            (SqlValue::Decimal(total), None),
            (SqlValue::I64(4_000_000_000), None),
            (text(r#"{"k": [1, 2]}"#), None),
        ]
    );
}

#[test]
fn db2_vendor_types_round_trip() {
    let columns = [
        ColumnDescriptor::new("RATE", -360, "DECFLOAT"),
        ColumnDescriptor::new("DOC", types::SQLXML, "XML"),
        ColumnDescriptor::new("SEEN", types::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE"),
    ];
    let seen = offset_ts("2024-07-01T12:00:00+05:30");
    let row = vec![
        SqlValue::Decimal(Decimal::from_str("1.25").unwrap()),
        text(r#"<order id="7"/>"#),
        SqlValue::DateTimeOffset(seen),
    ];
    let bound = round_trip(DialectKind::Db2, ReaderOptions::default(), &columns, row, None);
    assert_eq!(
        bound,
        vec![
            (SqlValue::F64(1.25), None),
            (text(r#"<order id="7"/>"#), Some(types::SQLXML)),
            (SqlValue::DateTimeOffset(seen), None),
        ]
    );
}

#[test]
fn nulls_bind_as_typed_nulls() {
    let r = record(
        vec![Field::new("note", FieldType::String).with_nullable(true)],
        vec![Value::Null],
    );
    let exec = write(DialectKind::Db2, &r, &[ColumnDescriptor::new("NOTE", types::CLOB, "CLOB")]).unwrap();
    assert_eq!(exec.current[0], Some((SqlValue::Null, Some(types::CLOB))));
}

#[test]
fn decimal_rescaled_to_target_scale() {
    let r = record(
        vec![Field::decimal("price", 10, 2)],
        vec![Value::Decimal(Decimal::from_str("3.10").unwrap())],
    );
    let columns = [ColumnDescriptor::new("price", types::NUMERIC, "NUMBER").with_precision(12, 4)];
    let exec = write(DialectKind::Oracle, &r, &columns).unwrap();
    match &exec.current[0] {
        Some((SqlValue::Decimal(d), None)) => assert_eq!(d.to_string(), "3.1000"),
        other => panic!("unexpected {:?}", other),
    }

    let narrow = [ColumnDescriptor::new("price", types::NUMERIC, "NUMBER").with_precision(12, 0)];
    let err = write(DialectKind::Oracle, &r, &narrow).err().unwrap();
    assert!(matches!(err, MarshalError::DataWrite { ref column, .. } if column == "price"));
}

#[test]
fn sqlserver_spatial_time_and_offset() {
    let r = record(
        vec![
            Field::new("shape", FieldType::String).with_nullable(true),
            Field::new("area", FieldType::Bytes).with_nullable(true),
            Field::logical("opens", LogicalType::TimeMicros),
            Field::new("seen", FieldType::String),
        ],
        vec![
            Value::String("POINT (30 10)".into()),
            Value::Null,
            Value::Time(NaiveTime::from_hms_micro_opt(9, 30, 0, 120_000).unwrap()),
            Value::String("2024-05-01 10:00:00 +02:00".into()),
        ],
    );
    let columns = [
        ColumnDescriptor::new("shape", -157, "geometry"),
        ColumnDescriptor::new("area", -158, "geography"),
        ColumnDescriptor::new("opens", types::TIME, "time"),
        ColumnDescriptor::new("seen", -155, "datetimeoffset"),
    ];
    let exec = write(DialectKind::SqlServer, &r, &columns).unwrap();
    assert_eq!(exec.current[0], Some((text("POINT (30 10)"), None)));
    assert_eq!(exec.current[1], Some((text("NULL"), None)));
    assert_eq!(exec.current[2], Some((text("09:30:00.1200000"), Some(types::VARCHAR))));
    let expected = DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap();
    assert_eq!(exec.current[3], Some((SqlValue::DateTimeOffset(expected), Some(-155))));
}

#[test]
fn sqlserver_bad_offset_text_is_data_write() {
    let r = record(vec![Field::new("seen", FieldType::String)], vec![Value::String("soon".into())]);
    let err = write(DialectKind::SqlServer, &r, &[ColumnDescriptor::new("seen", -155, "datetimeoffset")])
        .err()
        .unwrap();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn oracle_offsets_intervals_and_bfile() {
    let r = record(
        vec![
            Field::new("created", FieldType::String),
            Field::new("lease", FieldType::String),
            Field::new("active", FieldType::Boolean),
        ],
        vec![
            Value::String("2023-11-05T08:00:00-07:00".into()),
            Value::String("+02 03:00:00.000000".into()),
            Value::Boolean(true),
        ],
    );
    let columns = [
        ColumnDescriptor::new("CREATED", -101, "TIMESTAMP WITH TIME ZONE"),
        ColumnDescriptor::new("LEASE", -104, "INTERVALDS"),
        ColumnDescriptor::new("ACTIVE", types::NUMERIC, "NUMBER").with_precision(1, 0),
    ];
    let exec = write(DialectKind::Oracle, &r, &columns).unwrap();
    let created = DateTime::parse_from_rfc3339("2023-11-05T08:00:00-07:00").unwrap();
    assert_eq!(exec.current[0], Some((SqlValue::DateTimeOffset(created), Some(-101))));
    assert_eq!(exec.current[1], Some((text("+02 03:00:00.000000"), Some(-104))));
    assert_eq!(exec.current[2], Some((SqlValue::I32(1), Some(types::NUMERIC))));

    let r = record(vec![Field::new("doc", FieldType::Bytes)], vec![Value::Bytes(vec![1])]);
    let err = write(DialectKind::Oracle, &r, &[ColumnDescriptor::new("DOC", -13, "BFILE")])
        .err()
        .unwrap();
    assert!(matches!(err, MarshalError::DataWrite { ref column, .. } if column == "DOC"));
}

#[test]
fn postgres_casts_text_on_the_server() {
    let r = record(
        vec![Field::new("id", FieldType::String), Field::new("addr", FieldType::String)],
        vec![
            Value::String("8c0e3b1e-5a52-4a3e-9a9b-0c1f2d3e4f50".into()),
            Value::String("10.0.0.0/8".into()),
        ],
    );
    let columns = [
        ColumnDescriptor::new("id", types::OTHER, "uuid"),
        ColumnDescriptor::new("addr", types::OTHER, "cidr"),
    ];
    let exec = write(DialectKind::CloudSqlPostgres, &r, &columns).unwrap();
    assert!(exec.current.iter().all(|p| p.as_ref().unwrap().1 == Some(types::OTHER)));
}

#[test]
fn db2_xml_and_mysql_year() {
    let r = record(vec![Field::new("doc", FieldType::String)], vec![Value::String("<a/>".into())]);
    let exec = write(DialectKind::Db2, &r, &[ColumnDescriptor::new("DOC", types::SQLXML, "XML")]).unwrap();
    assert_eq!(exec.current[0], Some((text("<a/>"), Some(types::SQLXML))));

    let r = record(vec![Field::new("y", FieldType::Int)], vec![Value::Int(1999)]);
    let exec = write(DialectKind::AuroraMysql, &r, &[ColumnDescriptor::new("y", types::DATE, "YEAR")]).unwrap();
    assert_eq!(exec.current[0], Some((SqlValue::I32(1999), Some(types::INTEGER))));
}

#[test]
fn binding_follows_remap_and_subset() {
    let schema = Arc::new(
        Schema::new(vec![
            Field::new("userId", FieldType::Long),
            Field::new("email", FieldType::String),
            Field::new("extra", FieldType::Int),
        ])
        .unwrap(),
    );
    let r = Record::from_values(
        schema,
        vec![Value::Long(5), Value::String("a@b.c".into()), Value::Int(0)],
    )
    .unwrap();
    let remap: ColumnRemap = [("userId".to_string(), "USER_ID".to_string())].into_iter().collect();
    let columns = [
        ColumnDescriptor::new("EMAIL", types::VARCHAR, "VARCHAR"),
        ColumnDescriptor::new("USER_ID", types::BIGINT, "BIGINT"),
    ];
    let subset = Schema::new(vec![
        Field::new("email", FieldType::String),
        Field::new("userId", FieldType::Long),
    ])
    .unwrap();
    let binding = ColumnTypeBinding::resolve(&subset, &columns, &remap).unwrap();
    assert_eq!(binding.column_names(), vec!["EMAIL".to_string(), "USER_ID".to_string()]);

    let dialect = builtin(DialectKind::Mysql, ReaderOptions::default());
    let mut exec = FakeExecutor::default();
    dialect.write_row(&mut exec, &r, &binding).unwrap();
    assert_eq!(exec.current, vec![Some((text("a@b.c"), None)), Some((SqlValue::I64(5), None))]);
}

#[test]
fn bind_failure_names_the_column() {
    let r = record(vec![Field::new("n", FieldType::Int)], vec![Value::Int(1)]);
    let dialect = builtin(DialectKind::Generic, ReaderOptions::default());
    let binding = ColumnTypeBinding::resolve(
        r.schema(),
        &[ColumnDescriptor::new("N", types::INTEGER, "INTEGER")],
        &ColumnRemap::default(),
    )
    .unwrap();
    let mut exec = FakeExecutor {
        fail_bind_at: Some(0),
        ..Default::default()
    };
    let err = dialect.write_row(&mut exec, &r, &binding).unwrap_err();
    assert!(matches!(err, MarshalError::DataWrite { ref column, .. } if column == "N"));
}
