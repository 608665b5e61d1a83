//! Gradient-boosted regression tree ensemble.
//!
//! Reads the JSON model export of a tree booster (`learner.gradient_booster.model.trees`)
//! and evaluates it the same way the booster does:
//!
//! - inputs are compared as `f32`; `x < split` goes left, otherwise right
//! - a NaN input follows the node's default direction
//! - a node with `left_children == -1` is a leaf whose value is stored in
//!   `split_conditions`
//! - the output is `base_score + Σ leaf values` (identity-link objectives only)

use std::io::Read;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Predictor;

/// Objectives whose raw margin is the prediction.
const IDENTITY_OBJECTIVES: [&str; 6] = [
    "reg:squarederror",
    "reg:linear",
    "reg:squaredlogerror",
    "reg:pseudohubererror",
    "reg:absoluteerror",
    "reg:quantileerror",
];

#[derive(Debug, Deserialize)]
struct BoosterFile {
    learner: LearnerSection,
}

#[derive(Debug, Deserialize)]
struct LearnerSection {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: GradientBoosterSection,
    learner_model_param: LearnerModelParam,
    #[serde(default)]
    objective: Option<ObjectiveSection>,
}

#[derive(Debug, Deserialize)]
struct GradientBoosterSection {
    name: String,
    #[serde(default)]
    model: Option<GbTreeModel>,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    trees: Vec<TreeSection>,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    #[serde(default)]
    num_feature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveSection {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TreeSection {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
}

/// Older exports write `default_left` as 0/1, newer ones may use booleans.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Int(u8),
    Bool(bool),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Int(v) => v != 0,
            Flag::Bool(v) => v,
        }
    }
}

/// One regression tree in flat array form.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    left: Vec<i32>,
    right: Vec<i32>,
    feature: Vec<u32>,
    split: Vec<f32>,
    default_left: Vec<bool>,
}

impl RegressionTree {
    /// Validate and build a tree.
    ///
    /// Children must point strictly forward, which also rules out cycles.
    pub fn new(
        left: Vec<i32>,
        right: Vec<i32>,
        feature: Vec<u32>,
        split: Vec<f32>,
        default_left: Vec<bool>,
        n_features: usize,
    ) -> Result<Self, AppError> {
        let n = left.len();
        if n == 0 {
            return Err(AppError::input("Tree has no nodes."));
        }
        if right.len() != n || feature.len() != n || split.len() != n || default_left.len() != n {
            return Err(AppError::input(format!(
                "Tree arrays disagree in length (left={n}, right={}, split_indices={}, split_conditions={}, default_left={}).",
                right.len(),
                feature.len(),
                split.len(),
                default_left.len()
            )));
        }
        for node in 0..n {
            if left[node] < 0 {
                continue;
            }
            for child in [left[node], right[node]] {
                let ok = usize::try_from(child).is_ok_and(|c| c > node && c < n);
                if !ok {
                    return Err(AppError::input(format!(
                        "Tree node {node} has invalid child index {child}."
                    )));
                }
            }
            if feature[node] as usize >= n_features {
                return Err(AppError::input(format!(
                    "Tree node {node} splits on feature {} but the model has {n_features} features.",
                    feature[node]
                )));
            }
        }
        Ok(Self {
            left,
            right,
            feature,
            split,
            default_left,
        })
    }

    /// Walk from the root to a leaf and return its value.
    pub fn leaf_value(&self, x: &[f32]) -> f32 {
        let mut node = 0usize;
        loop {
            let left = self.left[node];
            if left < 0 {
                return self.split[node];
            }
            let v = x[self.feature[node] as usize];
            let go_left = if v.is_nan() {
                self.default_left[node]
            } else {
                v < self.split[node]
            };
            node = if go_left { left as usize } else { self.right[node] as usize };
        }
    }
}

/// Additive tree ensemble with a constant base score.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    base_score: f32,
    trees: Vec<RegressionTree>,
    n_features: usize,
    feature_names: Vec<String>,
}

impl TreeEnsemble {
    pub fn new(
        base_score: f32,
        trees: Vec<RegressionTree>,
        n_features: usize,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            base_score,
            trees,
            n_features,
            feature_names,
        }
    }

    /// Parse a booster JSON export.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let file: BoosterFile = serde_json::from_reader(reader)
            .map_err(|e| AppError::input(format!("Invalid model JSON: {e}")))?;
        let learner = file.learner;

        if let Some(objective) = &learner.objective {
            if !IDENTITY_OBJECTIVES.contains(&objective.name.as_str()) {
                return Err(AppError::input(format!(
                    "Unsupported model objective '{}'; expected a regression objective.",
                    objective.name
                )));
            }
        }

        if learner.gradient_booster.name != "gbtree" {
            return Err(AppError::input(format!(
                "Unsupported booster '{}'; expected 'gbtree'.",
                learner.gradient_booster.name
            )));
        }
        let model = learner
            .gradient_booster
            .model
            .ok_or_else(|| AppError::input("Model JSON has no tree model."))?;

        let base_score = parse_base_score(&learner.learner_model_param.base_score)?;
        let n_features = resolve_feature_count(
            learner.learner_model_param.num_feature.as_deref(),
            &learner.feature_names,
            &model.trees,
        )?;

        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(idx, t)| {
                RegressionTree::new(
                    t.left_children,
                    t.right_children,
                    t.split_indices,
                    t.split_conditions,
                    t.default_left.into_iter().map(Flag::is_set).collect(),
                    n_features,
                )
                .map_err(|e| AppError::input(format!("Tree {idx}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(base_score, trees, n_features, learner.feature_names))
    }

    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature names recorded at training time; empty when the export has none.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl Predictor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, AppError> {
        if features.len() != self.n_features {
            return Err(AppError::runtime(format!(
                "Model expects {} features, got {}.",
                self.n_features,
                features.len()
            )));
        }
        let x: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let margin = self
            .trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.leaf_value(&x));
        Ok(vec![f64::from(margin)])
    }
}

/// Base score is written as `"5E-1"` or, by newer exports, `"[5E-1]"`.
fn parse_base_score(raw: &str) -> Result<f32, AppError> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']').trim();
    trimmed
        .parse::<f32>()
        .map_err(|e| AppError::input(format!("Invalid base_score '{raw}': {e}")))
}

fn resolve_feature_count(
    num_feature: Option<&str>,
    feature_names: &[String],
    trees: &[TreeSection],
) -> Result<usize, AppError> {
    if let Some(raw) = num_feature {
        return raw
            .trim()
            .parse::<usize>()
            .map_err(|e| AppError::input(format!("Invalid num_feature '{raw}': {e}")));
    }
    if !feature_names.is_empty() {
        return Ok(feature_names.len());
    }
    let max_index = trees
        .iter()
        .flat_map(|t| t.split_indices.iter())
        .max()
        .map_or(0, |m| *m as usize + 1);
    Ok(max_index)
}
