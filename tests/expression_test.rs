use gtex_client::{GeneExpression, MedianExpression, TopExpressedGenes};
use gtex_client::visuals;

const MEDIAN_BODY: &str = r#"{
    "clusters": {
        "gene": "(SMIM40:0.5,ACE2:0.5);",
        "tissue": "Not enough data to cluster"
    },
    "data": [
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000182240.15",
            "geneSymbol": "SMIM40",
            "median": 2.21,
            "tissueSiteDetailId": "Esophagus_Mucosa",
            "unit": "TPM"
        },
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000130234.10",
            "geneSymbol": "ACE2",
            "median": 0.774831,
            "tissueSiteDetailId": "Esophagus_Mucosa",
            "unit": "TPM"
        },
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000182240.15",
            "geneSymbol": "SMIM40",
            "median": 1.05,
            "tissueSiteDetailId": "Esophagus_Muscularis",
            "unit": "TPM"
        },
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000130234.10",
            "geneSymbol": "ACE2",
            "median": 0.132,
            "tissueSiteDetailId": "Esophagus_Muscularis",
            "unit": "TPM"
        }
    ]
}"#;

#[test]
fn records_are_tagged_with_gene_and_tissue() {
    let model = MedianExpression::from_json(MEDIAN_BODY).unwrap();
    assert_eq!(model.records().len(), 4);

    let first = &model.records()[0];
    assert_eq!(first.gene_symbol, "SMIM40");
    assert_eq!(first.tissue_site_detail_id, "Esophagus_Mucosa");
    assert_eq!(first.median, 2.21);
    assert_eq!(first.unit, "TPM");
    assert!(first.subset_group.is_none());
}

#[test]
fn median_matrix_groups_by_tissue_in_gene_order() {
    let model = MedianExpression::from_json(MEDIAN_BODY).unwrap();
    let (genes, medians) = model.median_matrix();

    assert_eq!(genes, vec!["SMIM40", "ACE2"]);
    assert_eq!(medians["Esophagus_Mucosa"], vec![2.21, 0.774831]);
    assert_eq!(medians["Esophagus_Muscularis"], vec![1.05, 0.132]);
}

#[test]
fn cluster_accessors_guard_the_sentinel() {
    let model = MedianExpression::from_json(MEDIAN_BODY).unwrap();
    assert_eq!(model.genes_cluster(), Some("(SMIM40:0.5,ACE2:0.5);"));
    // "Not enough data" answers are reported as no cluster at all.
    assert_eq!(model.tissues_cluster(), None);
}

#[test]
fn missing_clusters_key_means_no_clusters() {
    let model = MedianExpression::from_json(r#"{"data": []}"#).unwrap();
    assert_eq!(model.genes_cluster(), None);
    assert_eq!(model.tissues_cluster(), None);
}

const RAW_EXPRESSION_BODY: &str = r#"{
    "data": [
        {
            "data": [22.97, 22.1, 15.52],
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000186318.16",
            "geneSymbol": "BACE1",
            "tissueSiteDetailId": "Thyroid",
            "unit": "TPM",
            "subsetGroup": "female"
        },
        {
            "data": [],
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000186318.16",
            "geneSymbol": "BACE1",
            "tissueSiteDetailId": "Kidney_Medulla",
            "unit": "TPM",
            "subsetGroup": "male"
        }
    ]
}"#;

#[test]
fn raw_expression_keeps_sample_vectors() {
    let model = GeneExpression::from_json(RAW_EXPRESSION_BODY).unwrap();
    assert_eq!(model.records().len(), 2);
    assert_eq!(model.records()[0].data, vec![22.97, 22.1, 15.52]);
    assert_eq!(model.records()[0].subset_group.as_deref(), Some("female"));
}

#[test]
fn expression_summary_orders_and_summarizes() {
    let model = GeneExpression::from_json(RAW_EXPRESSION_BODY).unwrap();
    let rows = visuals::expression_summary(&model);

    assert_eq!(rows.len(), 2);
    // Ordered by tissue id: Kidney_Medulla before Thyroid.
    assert_eq!(rows[0].tissue_site_detail_id, "Kidney_Medulla");
    assert_eq!(rows[0].samples, 0);
    assert_eq!(rows[0].median, 0.0); // empty sample vector
    assert_eq!(rows[1].tissue_site_detail_id, "Thyroid");
    assert_eq!(rows[1].samples, 3);
    assert_eq!(rows[1].median, 22.1);
    assert_eq!(rows[1].subset_group.as_deref(), Some("female"));
}

const TOP_BODY: &str = r#"{
    "data": [
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000198886.2",
            "geneSymbol": "MT-ND4",
            "median": 20948.5,
            "tissueSiteDetailId": "Ovary",
            "unit": "TPM"
        },
        {
            "datasetId": "gtex_v8",
            "gencodeId": "ENSG00000130234.10",
            "geneSymbol": "ACE2",
            "median": 12.3,
            "tissueSiteDetailId": "Ovary",
            "unit": "TPM"
        }
    ]
}"#;

#[test]
fn top_expressed_lookup_by_symbol_or_gencode_id() {
    let model = TopExpressedGenes::from_json(TOP_BODY).unwrap();
    assert_eq!(model.median_of("MT-ND4"), Some(20948.5));
    assert_eq!(model.median_of("ENSG00000130234.10"), Some(12.3));
    assert_eq!(model.median_of("BRCA1"), None);

    let by_symbol = model.by_symbol();
    assert_eq!(by_symbol["ACE2"], 12.3);
    assert_eq!(by_symbol.len(), 2);
}
