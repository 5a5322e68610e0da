//! Reading an extracted release and its side files from disk.

use std::fs;

use frs_ingest::{
    IngestError, RawTableSource, ReleaseLayout, TabDirectory, load_codebook,
    load_uprating_parameters, locate_release_data,
};
use tempfile::TempDir;

#[test]
fn tab_release_tables_are_readable_by_name() {
    let dir = TempDir::new().unwrap();
    let tab = dir.path().join("UKDA-8633-tab").join("tab");
    fs::create_dir_all(&tab).unwrap();
    fs::write(tab.join("Adult.tab"), "SERNUM\tPERSON\tAGE80\n1\t1\t45\n2\t1\t80\n").unwrap();
    fs::write(tab.join("househol.tab"), "SERNUM\tGROSS4\n1\t1500\n").unwrap();
    fs::write(tab.join("readme.txt"), "not a table").unwrap();

    let ReleaseLayout::Tab(found) = locate_release_data(dir.path()).unwrap() else {
        panic!("expected tab layout");
    };
    let source = TabDirectory::new(found);
    assert_eq!(source.table_names().unwrap(), vec!["adult", "househol"]);

    let adult = source.read_table("ADULT").unwrap();
    assert_eq!(adult.height(), 2);
    assert_eq!(adult.width(), 3);
    assert!(matches!(
        source.read_table("job"),
        Err(IngestError::TableNotFound { .. })
    ));
}

#[test]
fn uprating_config_loads_population_relative_to_yaml() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("uprating.yaml"),
        "weight_column: GROSS4\n\
         population: population.csv\n\
         groups:\n  \
           benefits:\n    \
             variables: [BENAMT]\n    \
             index: {2020: 100.0, 2021: 103.1}\n",
    )
    .unwrap();
    fs::write(
        config_dir.join("population.csv"),
        "age,2020,2021\n0,3900,3880\n5,4100,4150\n",
    )
    .unwrap();

    let parameters = load_uprating_parameters(&config_dir.join("uprating.yaml")).unwrap();
    assert_eq!(parameters.weight_column(), "GROSS4");
    assert_eq!(parameters.groups["benefits"].value(2021), Some(103.1));
    let projection = parameters.projection.unwrap();
    assert_eq!(projection.population(5, 2021), Some(4150.0));
    assert_eq!(projection.total(2020), Some(8000.0));
}

#[test]
fn codebook_with_numeric_labels_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codebook.json");
    fs::write(
        &path,
        r#"{"TENURE": {"description": "Tenure", "codemap": {"1": "Owned", "2": 2}}, "GROSS4": {}}"#,
    )
    .unwrap();
    let codebook = load_codebook(&path).unwrap();
    assert_eq!(codebook.len(), 2);
    let tenure = codebook.get("TENURE").unwrap();
    assert_eq!(tenure.label("2"), Some("2"));
    assert_eq!(codebook.get("GROSS4").unwrap().description_or_default(), "No description provided");
}
