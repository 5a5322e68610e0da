//! Save a zipped release, then read it back through a session.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use frs_common::column_f64_values;
use frs_core::{Frs, FrsError, FrsStore, SaveOptions, save_release};
use frs_ingest::load_uprating_parameters;
use frs_transform::consolidate;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const ADULT: &str = "SERNUM\tBENUNIT\tPERSON\tISSUE\tINEARNS\tAGE80\tGROSS4\tSEX\n\
1\t0\t1\t1\t1000\t34\t100\t1\n\
1\t0\t2\t1\t0\t36\t100\t2\n";
const JOB: &str = "sernum\tbenunit\tperson\tINCOME\n1\t0\t1\t10\n1\t0\t1\t20\n1\t0\t1\t30\n";
const HOUSEHOLD: &str = "SERNUM\tGROSS4\tMONTH\n1\t200\t4\n";

fn write_zip(path: &Path) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, body) in [("adult", ADULT), ("job", JOB), ("househol", HOUSEHOLD)] {
        zip.start_file(format!("UKDA-8802-tab/tab/{name}.tab"), options)
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn saved_store(dir: &TempDir) -> FrsStore {
    let archive = dir.path().join("frs.zip");
    write_zip(&archive);
    let codebook = dir.path().join("codebook.json");
    fs::write(
        &codebook,
        r#"{"SEX": {"description": "Sex of adult", "codemap": {"1": "Male", "2": "Female"}}}"#,
    )
    .unwrap();

    let store = FrsStore::new(dir.path().join("store"));
    let options = SaveOptions {
        extracted: false,
        codebook: Some(codebook),
    };
    let summary = save_release(&store, &archive, 2019, &options).unwrap();
    assert_eq!(summary.tables.len(), 3);
    assert_eq!(summary.codebook_variables, Some(1));
    store
}

fn f64s(frame: &frs_transform::EntityFrame, column: &str) -> Vec<Option<f64>> {
    column_f64_values(frame.data.column(column).unwrap()).unwrap()
}

#[test]
fn stored_year_is_served_as_saved() {
    let dir = TempDir::new().unwrap();
    let mut frs = Frs::open(saved_store(&dir), 2019, None).unwrap();

    assert_eq!(frs.table_names().unwrap(), vec!["adult", "househol", "job"]);
    let adult = frs.table("adult").unwrap();
    assert_eq!(adult.keys().unwrap(), vec![101, 102]);
    assert!(adult.data.column("ISSUE").is_err());

    assert_eq!(frs.label("sex", "2"), Some("Female"));
    assert_eq!(frs.label("SEX", "2.0"), Some("Female"));
    assert_eq!(frs.describe("SEX"), "SEX: \"Sex of adult\" (2 categories)");

    let jobs = frs.table("job").unwrap().clone();
    let wide = consolidate(&jobs, 2, Some("jobs")).unwrap();
    let joined = {
        let adult = frs.table("adult").unwrap().clone();
        frs_transform::join_frames(&[adult, wide]).unwrap()
    };
    assert_eq!(f64s(&joined, "INCOME_other"), vec![Some(50.0), None]);
}

#[test]
fn later_year_is_uprated_from_latest_stored() {
    let dir = TempDir::new().unwrap();
    let store = saved_store(&dir);
    let config = dir.path().join("uprating.yaml");
    fs::write(
        &config,
        "population: population.csv\n\
         groups:\n  labour_income:\n    variables: [INEARNS, INCOME]\n    index: {2019: 1.0, 2020: 1.05}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("population.csv"),
        "age,2019,2020\n0,100,100\n30,200,220\n35,200,180\n",
    )
    .unwrap();
    let parameters = load_uprating_parameters(&config).unwrap();

    let mut frs = Frs::open(store, 2020, Some(&parameters)).unwrap();
    assert!(frs.is_uprated());
    assert_eq!(frs.base_year(), 2019);
    assert_eq!(frs.year(), 2020);

    let adult = frs.table("adult").unwrap();
    assert_eq!(f64s(adult, "INEARNS"), vec![Some(1050.0), Some(0.0)]);
    let weights = f64s(adult, "GROSS4");
    assert!((weights[0].unwrap() - 110.0).abs() < 1e-9);
    assert!((weights[1].unwrap() - 90.0).abs() < 1e-9);

    // No age column: the total population ratio (500 / 500) applies.
    let household = frs.table("househol").unwrap();
    assert_eq!(f64s(household, "GROSS4"), vec![Some(200.0)]);
}

#[test]
fn uncovered_target_year_fails_at_open() {
    let dir = TempDir::new().unwrap();
    let store = saved_store(&dir);
    let config = dir.path().join("uprating.yaml");
    fs::write(
        &config,
        "groups:\n  labour_income:\n    variables: [INEARNS]\n    index: {2019: 1.0}\n",
    )
    .unwrap();
    let parameters = load_uprating_parameters(&config).unwrap();
    let err = Frs::open(store, 2021, Some(&parameters)).unwrap_err();
    assert!(matches!(err, FrsError::Transform(_)));
}

#[test]
fn saving_again_replaces_the_year() {
    let dir = TempDir::new().unwrap();
    let store = saved_store(&dir);
    fs::write(store.year_dir(2019).join("stale.csv"), "household_id\n1\n").unwrap();

    let release = dir.path().join("extracted");
    let tab = release.join("UKDA-8802-tab").join("tab");
    fs::create_dir_all(&tab).unwrap();
    fs::write(tab.join("househol.tab"), HOUSEHOLD).unwrap();
    let options = SaveOptions {
        extracted: true,
        codebook: None,
    };
    save_release(&store, &release, 2019, &options).unwrap();
    assert_eq!(store.table_names(2019).unwrap(), vec!["househol"]);
}
