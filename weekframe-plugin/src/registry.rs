//! Plugin Registry

use crate::{CallContext, FunctionMeta, FunctionPlugin};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};
use weekframe_core::{Value, WeekframeError};

/// Central function registry, immutable once built
pub struct PluginRegistry {
    functions: BTreeMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Metadata of every registered function, sorted by name
    pub fn function_metas(&self) -> Vec<FunctionMeta> {
        self.functions.values().map(|f| f.meta()).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &CallContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "calling function");
                let result = f.call(args, ctx);
                if let Value::Error(ref e) = result {
                    debug!(function = name, code = %e.code, "function returned error");
                }
                result
            }
            None => {
                warn!(function = name, "unknown function");
                let similar = self.find_similar_functions(name);
                let mut err = WeekframeError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Function names resembling `name`, most similar first
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .functions
            .keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                (score > 0).then(|| (func_name.clone(), score))
            })
            .collect();

        // Stable sort keeps alphabetical order among equal scores
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared words like "week" or "year" matter more than shared letters
        let query_words: HashSet<&str> = query.split('_').collect();
        let shared_words = candidate.split('_').filter(|w| query_words.contains(w)).count();
        score += shared_words * 20;

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        score += query_chars.intersection(&candidate_chars).count() * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.get_function(name) {
            Some(f) => Value::Object(function_to_help(f.meta())),
            None => Value::Error(WeekframeError::undefined_func(name)),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
        for f in self.functions.values() {
            let meta = f.meta();
            funcs_by_cat
                .entry(meta.category)
                .or_default()
                .push(Value::from(meta.name));
        }

        let mut help = HashMap::new();
        help.insert(
            "functions".to_string(),
            Value::Object(
                funcs_by_cat
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), Value::List(v)))
                    .collect(),
            ),
        );
        help.insert(
            "usage".to_string(),
            Value::from("Call help('function_name') for detailed help."),
        );
        Value::Object(help)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self
            .functions
            .values()
            .map(|f| f.meta())
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .map(|meta| {
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::from(meta.name));
                obj.insert("description".to_string(), Value::from(meta.description));
                obj.insert("usage".to_string(), Value::from(meta.usage));
                obj.insert("category".to_string(), Value::from(meta.category));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }
}

fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
    let mut help = HashMap::new();
    help.insert("name".to_string(), Value::from(meta.name));
    help.insert("description".to_string(), Value::from(meta.description));
    help.insert("usage".to_string(), Value::from(meta.usage));
    help.insert("returns".to_string(), Value::from(meta.returns));
    help.insert("category".to_string(), Value::from(meta.category));
    help.insert(
        "args".to_string(),
        Value::List(
            meta.args
                .iter()
                .map(|a| {
                    let mut arg = HashMap::new();
                    arg.insert("name".to_string(), Value::from(a.name));
                    arg.insert("type".to_string(), Value::from(a.typ));
                    arg.insert("description".to_string(), Value::from(a.description));
                    arg.insert("optional".to_string(), Value::Bool(a.optional));
                    if let Some(default) = a.default {
                        arg.insert("default".to_string(), Value::from(default));
                    }
                    Value::Object(arg)
                })
                .collect(),
        ),
    );
    help.insert(
        "examples".to_string(),
        Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect()),
    );
    help.insert(
        "related".to_string(),
        Value::List(meta.related.iter().map(|r| Value::from(*r)).collect()),
    );
    help
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
