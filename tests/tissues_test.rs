use gtex_client::{GtexError, TissueField, TissuesInfo};

const TISSUES_BODY: &str = r#"{
    "data": [
        {
            "datasetId": "gtex_v8",
            "samplingSite": "Subcutaneous tissue beneath the leg's skin sample.",
            "tissueSite": "Adipose Tissue",
            "tissueSiteDetail": "Adipose - Subcutaneous",
            "tissueSiteDetailAbbr": "ADPSBQ",
            "tissueSiteDetailId": "Adipose_Subcutaneous",
            "uberonId": "0002190"
        },
        {
            "datasetId": "gtex_v8",
            "samplingSite": "Sigmoid colon sample.",
            "tissueSite": "Colon",
            "tissueSiteDetail": "Colon - Sigmoid",
            "tissueSiteDetailAbbr": "CLNSGM",
            "tissueSiteDetailId": "Colon_Sigmoid",
            "uberonId": "0001159"
        },
        {
            "datasetId": "gtex_v8",
            "samplingSite": "Transverse colon sample.",
            "tissueSite": "Colon",
            "tissueSiteDetail": "Colon - Transverse",
            "tissueSiteDetailAbbr": "CLNTRN",
            "tissueSiteDetailId": "Colon_Transverse",
            "uberonId": "0001157"
        }
    ]
}"#;

#[test]
fn values_preserve_length_and_order() {
    let model = TissuesInfo::from_json(TISSUES_BODY).unwrap();
    assert_eq!(model.len(), 3);

    let ids = model.values(TissueField::TissueSiteDetailId);
    assert_eq!(ids.len(), model.len());
    assert_eq!(
        ids,
        vec!["Adipose_Subcutaneous", "Colon_Sigmoid", "Colon_Transverse"]
    );

    let details = model.values(TissueField::TissueSiteDetail);
    assert_eq!(
        details,
        vec![
            "Adipose - Subcutaneous",
            "Colon - Sigmoid",
            "Colon - Transverse"
        ]
    );
}

#[test]
fn dynamic_field_lookup_by_name() {
    let model = TissuesInfo::from_json(TISSUES_BODY).unwrap();
    let abbrs = model.get_tissues("tissueSiteDetailAbbr").unwrap();
    assert_eq!(abbrs, vec!["ADPSBQ", "CLNSGM", "CLNTRN"]);
}

#[test]
fn unknown_field_is_a_key_lookup_error() {
    let model = TissuesInfo::from_json(TISSUES_BODY).unwrap();
    let err = model.get_tissues("bogus_field").unwrap_err();
    match err {
        GtexError::KeyLookup { field } => assert_eq!(field, "bogus_field"),
        other => panic!("expected KeyLookup, got {other:?}"),
    }
}

#[test]
fn every_known_field_parses() {
    for name in [
        "datasetId",
        "samplingSite",
        "tissueSite",
        "tissueSiteDetail",
        "tissueSiteDetailAbbr",
        "tissueSiteDetailId",
        "uberonId",
    ] {
        let field: TissueField = name.parse().unwrap();
        assert_eq!(field.as_str(), name);
    }
}

#[test]
fn empty_catalog_is_a_valid_model() {
    let model = TissuesInfo::from_json(r#"{"data": []}"#).unwrap();
    assert!(model.is_empty());
    assert!(model.values(TissueField::TissueSite).is_empty());
}
