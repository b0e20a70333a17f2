//! Decision tree rendering sinks.
//!
//! `DotRenderer` emits Graphviz source with feature names on every split
//! and, for image formats, hands the source to the `dot` executable.
//! `TikzRenderer` writes the `forest` picture produced by `linfa-trees`;
//! its legend shows the feature names the tree was fitted with.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use linfa_trees::{DecisionTree, TreeNode};
use serde::{Deserialize, Serialize};

use crate::error::BenchmarkError;
use crate::models::classifier_trait::ClassifierModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFormat {
    #[default]
    Dot,
    Pdf,
    Png,
    Svg,
    Tikz,
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Dot => "dot",
            RenderFormat::Pdf => "pdf",
            RenderFormat::Png => "png",
            RenderFormat::Svg => "svg",
            RenderFormat::Tikz => "tex",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Ok(RenderFormat::Dot),
            "pdf" => Ok(RenderFormat::Pdf),
            "png" => Ok(RenderFormat::Png),
            "svg" => Ok(RenderFormat::Svg),
            "tikz" | "tex" => Ok(RenderFormat::Tikz),
            _ => Err(format!(
                "Unsupported render format: {}. Valid options are: dot, pdf, png, svg, tikz",
                s
            )),
        }
    }
}

/// Sink for a fitted tree. Returns the path of the artifact written.
pub trait TreeRenderer {
    fn render(
        &self,
        tree: &DecisionTree<f64, usize>,
        feature_names: &[String],
        output: &Path,
    ) -> Result<PathBuf, BenchmarkError>;
}

/// Graphviz renderer. `format` other than `Dot` requires `dot` on the PATH.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    pub format: RenderFormat,
}

impl DotRenderer {
    pub fn new(format: RenderFormat) -> Self {
        Self { format }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn write_node(
    node: &TreeNode<f64, usize>,
    feature_names: &[String],
    next_id: &mut usize,
    out: &mut String,
) -> usize {
    let id = *next_id;
    *next_id += 1;

    if node.is_leaf() {
        let class = node
            .prediction()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "    n{} [label=\"class = {}\", shape=box, style=filled, fillcolor=\"#e8f0fe\"];",
            id, class
        );
        return id;
    }

    let (feature, value, impurity_decrease) = node.split();
    let name = feature_names
        .get(feature)
        .cloned()
        .unwrap_or_else(|| format!("x[{}]", feature));
    let _ = writeln!(
        out,
        "    n{} [label=\"{} < {:.4}\\nimpurity decrease = {:.4}\"];",
        id,
        escape(&name),
        value,
        impurity_decrease
    );

    for (branch, child) in node.children().into_iter().enumerate() {
        if let Some(child) = child {
            let child_id = write_node(child, feature_names, next_id, out);
            let label = if branch == 0 { "true" } else { "false" };
            let _ = writeln!(out, "    n{} -> n{} [label=\"{}\"];", id, child_id, label);
        }
    }
    id
}

/// Graphviz source for a fitted tree.
pub fn tree_to_dot(tree: &DecisionTree<f64, usize>, feature_names: &[String]) -> String {
    let mut out = String::from("digraph DecisionTree {\n    node [shape=ellipse, fontname=\"Helvetica\"];\n");
    let mut next_id = 0;
    write_node(tree.root_node(), feature_names, &mut next_id, &mut out);
    out.push_str("}\n");
    out
}

impl TreeRenderer for DotRenderer {
    fn render(
        &self,
        tree: &DecisionTree<f64, usize>,
        feature_names: &[String],
        output: &Path,
    ) -> Result<PathBuf, BenchmarkError> {
        let dot_path = output.with_extension("dot");
        std::fs::write(&dot_path, tree_to_dot(tree, feature_names))
            .map_err(|e| BenchmarkError::Render(format!("{}: {}", dot_path.display(), e)))?;

        match self.format {
            RenderFormat::Dot => Ok(dot_path),
            RenderFormat::Pdf | RenderFormat::Png | RenderFormat::Svg => {
                let target = output.with_extension(self.format.extension());
                let status = Command::new("dot")
                    .arg(format!("-T{}", self.format.extension()))
                    .arg(&dot_path)
                    .arg("-o")
                    .arg(&target)
                    .status()
                    .map_err(|e| BenchmarkError::Render(format!("could not run graphviz `dot`: {}", e)))?;
                if !status.success() {
                    return Err(BenchmarkError::Render(format!(
                        "graphviz `dot` exited with {}",
                        status
                    )));
                }
                Ok(target)
            }
            RenderFormat::Tikz => Err(BenchmarkError::Render(
                "TikZ output is produced by TikzRenderer".to_string(),
            )),
        }
    }
}

/// TikZ renderer using the `linfa-trees` exporter, with a feature legend.
///
/// The legend takes its names from the tree itself, so the model must have
/// been given them through `ClassifierModel::set_feature_names` before
/// fitting. Names passed here are only checked against the tree.
#[derive(Debug, Clone, Default)]
pub struct TikzRenderer;

impl TreeRenderer for TikzRenderer {
    fn render(
        &self,
        tree: &DecisionTree<f64, usize>,
        feature_names: &[String],
        output: &Path,
    ) -> Result<PathBuf, BenchmarkError> {
        let unnamed = tree
            .iter_nodes()
            .filter(|node| !node.is_leaf())
            .any(|node| {
                let (feature, _, _) = node.split();
                node.feature_name() != feature_names.get(feature)
            });
        if unnamed {
            log::warn!(
                "Tree was fitted without matching feature names; the TikZ legend uses linfa's defaults"
            );
        }
        let tex = tree.export_to_tikz().with_legend().to_string();

        let path = output.with_extension(RenderFormat::Tikz.extension());
        std::fs::write(&path, tex)
            .map_err(|e| BenchmarkError::Render(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Render a fitted model through the renderer matching `format`.
///
/// Only tree-structured models can be rendered.
pub fn render_tree(
    model: &dyn ClassifierModel,
    feature_names: &[String],
    output: &Path,
    format: RenderFormat,
) -> Result<PathBuf, BenchmarkError> {
    let tree = model.as_decision_tree().ok_or_else(|| {
        BenchmarkError::Render(format!("model '{}' is not a decision tree", model.name()))
    })?;

    let renderer: Box<dyn TreeRenderer> = match format {
        RenderFormat::Tikz => Box::new(TikzRenderer),
        other => Box::new(DotRenderer::new(other)),
    };
    let path = renderer.render(tree, feature_names, output)?;
    log::info!("Decision tree rendered to {}", path.display());
    Ok(path)
}
