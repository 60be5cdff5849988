use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use gtex_client::models::expression::MedianExpression;
use gtex_client::visuals::{self, RenderOptions};
use gtex_client::{Genes, GtexClient, SubsetAttribute, TissueField, TissuesInfo};

fn print_usage() {
    eprintln!("Usage: gtex-report <gene>... [--tissues id,id,...] [--group sex|ageBracket]");
    eprintln!();
    eprintln!("Prints the median expression of the given genes (symbols or");
    eprintln!("Gencode IDs) across the given tissues, or across every tissue");
    eprintln!("in the catalog when --tissues is omitted.");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut genes: Vec<String> = Vec::new();
    let mut tissues: Vec<String> = Vec::new();
    let mut group: Option<SubsetAttribute> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tissues" => {
                let list = args.next().context("--tissues needs a comma-separated list")?;
                tissues.extend(list.split(',').map(str::to_string));
            }
            "--group" => {
                group = Some(match args.next().as_deref() {
                    Some("sex") => SubsetAttribute::Sex,
                    Some("ageBracket") => SubsetAttribute::AgeBracket,
                    other => bail!("unknown --group value {:?}", other),
                });
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => genes.push(arg),
        }
    }

    if genes.is_empty() {
        print_usage();
        bail!("no genes given");
    }

    let client = GtexClient::new();

    // Validate tissue identifiers against the catalog, or take the whole
    // catalog when none were given.
    let catalog = TissuesInfo::fetch(&client).context("fetching tissue catalog")?;
    let known = catalog.values(TissueField::TissueSiteDetailId);
    if tissues.is_empty() {
        tissues = known.iter().map(|t| t.to_string()).collect();
    } else if let Some(bad) = tissues.iter().find(|t| !known.contains(&t.as_str())) {
        bail!("unknown tissue id {bad:?}; see `dataset/tissueSiteDetail` for valid ids");
    }

    let gene_refs: Vec<&str> = genes.iter().map(String::as_str).collect();
    let resolved = Genes::fetch(&client, &gene_refs).context("resolving gene identifiers")?;
    if resolved.gencode_ids().is_empty() {
        bail!("none of {:?} resolved to a protein-coding gene", genes);
    }

    let tissue_refs: Vec<&str> = tissues.iter().map(String::as_str).collect();
    let expression = MedianExpression::fetch(&client, &resolved.gencode_ids(), &tissue_refs)
        .context("fetching median expression")?;

    let options = RenderOptions {
        sort_by: group,
        ..RenderOptions::default()
    };

    println!("{}", visuals::median_table(&expression, &options));
    println!("{}", visuals::median_bars(&expression, &options));

    if let Some(newick) = expression.tissues_cluster() {
        println!("Tissue clustering:");
        println!("{}", visuals::cluster_tree(newick));
    }

    // Demographic stratification goes through the raw expression endpoint.
    if group.is_some() {
        let report = visuals::expression_summary_report(
            &client,
            &resolved.gencode_ids(),
            &tissue_refs,
            &options,
        )?;
        println!("{report}");
    }

    Ok(())
}
