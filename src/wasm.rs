use crate::bounds::Bound;
use crate::metric::L2Metric;
use crate::table::{KdTreeTable, MetricTreeTable};
use js_sys::Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const TS_TREE_KINDS: &'static str = r#"
export type TreeKind = "metric" | "kd";
"#;

enum Inner {
    Metric(MetricTreeTable),
    Kd(KdTreeTable),
}

macro_rules! dispatch {
    ($inner:expr, $table:ident => $body:expr) => {
        match $inner {
            Inner::Metric($table) => $body,
            Inner::Kd($table) => $body,
        }
    };
}

/// WASM wrapper around an indexed table, using the Euclidean metric.
#[wasm_bindgen(js_name = SpatialIndex)]
pub struct SpatialIndex {
    inner: Inner,
}

#[wasm_bindgen(js_class = SpatialIndex)]
impl SpatialIndex {
    /// Indexes `data` (row-major, `dim` values per row) with a `"metric"` or `"kd"` tree.
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        dim: usize,
        data: Vec<f64>,
        weights: Option<Vec<f64>>,
        leaf_size: usize,
    ) -> Result<SpatialIndex, JsError> {
        let metric = L2Metric::default();
        let inner = match kind {
            "metric" => {
                let mut table = MetricTreeTable::from_rows(dim, data, weights)?;
                table.index_data(&metric, leaf_size)?;
                Inner::Metric(table)
            }
            "kd" => {
                let mut table = KdTreeTable::from_rows(dim, data, weights)?;
                table.index_data(&metric, leaf_size)?;
                Inner::Kd(table)
            }
            other => return Err(JsError::new(&format!("unknown tree kind {:?}", other))),
        };
        Ok(SpatialIndex { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn n_entries(&self) -> usize {
        dispatch!(&self.inner, t => t.n_entries())
    }

    #[wasm_bindgen(getter)]
    pub fn n_attributes(&self) -> usize {
        dispatch!(&self.inner, t => t.n_attributes())
    }

    /// Row at index `i` in tree order.
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        dispatch!(&self.inner, t => t.row(i).ok().map(|r| r.to_vec()))
    }

    pub fn weight(&self, i: usize) -> Option<f64> {
        dispatch!(&self.inner, t => t.weight(i).ok())
    }

    /// Position the row at index `i` had in the input data.
    pub fn original_index(&self, i: usize) -> Option<usize> {
        dispatch!(&self.inner, t => t.old_from_new().get(i).copied())
    }

    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> usize {
        dispatch!(&self.inner, t => t.tree().map_or(0, |root| root.node_count()))
    }

    #[wasm_bindgen(getter)]
    pub fn depth(&self) -> usize {
        dispatch!(&self.inner, t => t.tree().map_or(0, |root| root.depth()))
    }

    /// Leaf row ranges as `[begin, end]` pairs.
    pub fn leaves(&self) -> Array {
        let result = Array::new();
        dispatch!(&self.inner, t => {
            if let Some(root) = t.tree() {
                root.visit(&mut |node| {
                    if node.is_leaf() {
                        let pair = Array::new();
                        pair.push(&JsValue::from(node.begin() as u32));
                        pair.push(&JsValue::from(node.end() as u32));
                        result.push(&pair);
                    }
                });
            }
        });
        result
    }

    pub fn root_contains(&self, point: &[f64]) -> bool {
        let metric = L2Metric::default();
        dispatch!(&self.inner, t => t.tree().is_some_and(|root| root.bound().contains(&metric, point)))
    }

    pub fn random_point_inside(&self) -> Option<Vec<f64>> {
        let metric = L2Metric::default();
        let mut rng = rand::thread_rng();
        dispatch!(&self.inner, t => t
            .tree()
            .map(|root| root.bound().random_point_inside(&metric, &mut rng).into_vec()))
    }
}
