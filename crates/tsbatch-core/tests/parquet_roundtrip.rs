#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use ndarray::array;
use tempfile::TempDir;
use tsbatch_core::{
    Label, Series, StatsOptions, TableColumns, TableError, TsData, labels_from_column,
    table::{read_parquet_batch, write_parquet_batch},
    ts_stats_from_labels, with_label_column,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn sample() -> Result<TsData, Box<dyn std::error::Error>> {
    Ok(TsData::builder(vec![
        Series::univariate(vec![0.1; 10]),
        Series::univariate(vec![0.2; 10]),
        Series::univariate(vec![0.3; 20]),
        Series::univariate(vec![0.4; 20]),
    ])
    .context(vec![array![1.0, 0.0], array![2.0, 1.0], array![3.0, 0.0], array![4.0, 1.0]])
    .sernum(vec![100, 101, 102, 103])
    .build()?)
}

#[test]
fn write_then_read_file() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("batch.parquet");
    let data = sample()?;
    let names = vec!["age".to_string(), "sex".to_string()];

    data.write_parquet(&path, &TableColumns::default(), Some(&names))?;
    let back = TsData::from_parquet_path(&path, &TableColumns::default())?;

    assert_eq!(back, data);
    Ok(())
}

#[test]
fn labels_and_stats_from_a_file() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("labelled.parquet");

    let batch = sample()?.to_record_batch(&TableColumns::default(), None)?;
    let y: Vec<Label> = [0.0, 0.0, 1.0, 1.0].into_iter().map(Label::Scalar).collect();
    let batch = with_label_column(&batch, "label", &y)?;
    write_parquet_batch(&path, &batch)?;

    let table = read_parquet_batch(&path)?;
    let data = TsData::from_record_batch(&table, &TableColumns::default().excluding("label"))?;
    let labels = labels_from_column(&table, "label")?;
    assert_eq!(labels[2], Label::Scalar(1.0));
    assert_eq!(data.context_width(), 2);

    let report = ts_stats_from_labels(&data, &labels, &StatsOptions::default())?;
    assert_eq!(report.total.total_time, 60.0);
    assert_eq!(report.total.series_time_std, 5.0);
    assert_eq!(report.by_class[1].series_time_mean, 20.0);
    Ok(())
}

#[test]
fn missing_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope.parquet");
    let err = TsData::from_parquet_path(&path, &TableColumns::default()).unwrap_err();
    match err {
        TableError::Io { path: p, .. } => assert!(p.ends_with("nope.parquet")),
        other => panic!("unexpected error: {other}"),
    }
}
