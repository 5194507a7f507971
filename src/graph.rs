use std::collections::BTreeMap;
use std::fs;

use serde::{Serialize, Deserialize};

use crate::color::{ColorId, VertexId};
use crate::error::{ColoringError, Result};

/** value stored in a vertex attribute.

Serialized "untagged" so that JSON `null`, `true`, `3` and `1.5` map to
`Unset`, `Bool`, `Int` and `Float`.
*/
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// no value
    Unset,
    /// boolean value
    Bool(bool),
    /// integer value
    Int(i64),
    /// floating point value
    Float(f64),
}

impl Default for AttrValue {
    fn default() -> Self { AttrValue::Unset }
}

impl AttrValue {
    /// true iff no value is stored
    pub fn is_unset(&self) -> bool { matches!(self, AttrValue::Unset) }

    /// numeric view (integers are widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(x) => Some(*x),
            AttrValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// boolean view
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// color view: `Some(None)` if unset, `Some(Some(c))` for a non-negative integer
    pub fn as_color(&self) -> Option<Option<ColorId>> {
        match self {
            AttrValue::Unset => Some(None),
            AttrValue::Int(i) if *i >= 0 => Some(Some(*i as ColorId)),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b:bool) -> Self { AttrValue::Bool(b) }
}

impl From<f64> for AttrValue {
    fn from(x:f64) -> Self { AttrValue::Float(x) }
}

impl From<Option<ColorId>> for AttrValue {
    fn from(c:Option<ColorId>) -> Self {
        match c {
            None => AttrValue::Unset,
            Some(c) => AttrValue::Int(c as i64),
        }
    }
}


/** graph seen by the coloring procedure: vertices `0..n`, undirected edges, and
named per-vertex attributes.

Attribute failures (missing vertex, storage fault in a custom implementation)
are reported through `Result` and propagated unchanged by the callers.
*/
pub trait ColoringGraph {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// edge list (u,v)
    fn edges(&self) -> &[(VertexId, VertexId)];

    /// true if the attribute column exists
    fn has_attribute(&self, name:&str) -> bool;

    /// reads the attribute of vertex v
    fn attribute(&self, name:&str, v:VertexId) -> Result<AttrValue>;

    /// writes the attribute of vertex v (creates the column if needed)
    fn set_attribute(&mut self, name:&str, v:VertexId, value:AttrValue) -> Result<()>;

    /// sets the attribute of every vertex to the same value
    fn fill_attribute(&mut self, name:&str, value:AttrValue) -> Result<()> {
        for v in 0..self.nb_vertices() {
            self.set_attribute(name, v, value.clone())?;
        }
        Ok(())
    }

    /** creates the attribute column with a default value if it does not exist,
    and replaces unset entries by the default.
    Returns the number of vertices that received the default value. */
    fn ensure_attribute(&mut self, name:&str, default:AttrValue) -> Result<usize> {
        if !self.has_attribute(name) {
            self.fill_attribute(name, default)?;
            return Ok(self.nb_vertices());
        }
        let mut nb_defaulted = 0;
        for v in 0..self.nb_vertices() {
            if self.attribute(name, v)?.is_unset() {
                self.set_attribute(name, v, default.clone())?;
                nb_defaulted += 1;
            }
        }
        Ok(nb_defaulted)
    }
}


/** in-memory graph with named attribute columns. */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributedGraph {
    /// nb vertices
    nb_vertices: usize,
    /// edges of the graph
    edges: Vec<(VertexId,VertexId)>,
    /// attributes[name][v]: value of the attribute for vertex v
    #[serde(default)]
    attributes: BTreeMap<String, Vec<AttrValue>>,
}

impl ColoringGraph for AttributedGraph {
    fn nb_vertices(&self) -> usize { self.nb_vertices }

    fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }

    fn has_attribute(&self, name:&str) -> bool { self.attributes.contains_key(name) }

    fn attribute(&self, name:&str, v:VertexId) -> Result<AttrValue> {
        self.check_vertex(v)?;
        let column = self.attributes.get(name)
            .ok_or_else(|| ColoringError::MissingAttribute(name.to_string()))?;
        // columns read from a file may be shorter than the vertex set
        Ok(column.get(v).cloned().unwrap_or_default())
    }

    fn set_attribute(&mut self, name:&str, v:VertexId, value:AttrValue) -> Result<()> {
        self.check_vertex(v)?;
        let n = self.nb_vertices;
        let column = self.attributes.entry(name.to_string())
            .or_insert_with(|| vec![AttrValue::Unset ; n]);
        if column.len() < n { column.resize(n, AttrValue::Unset); }
        column[v] = value;
        Ok(())
    }

    fn fill_attribute(&mut self, name:&str, value:AttrValue) -> Result<()> {
        self.attributes.insert(name.to_string(), vec![value ; self.nb_vertices]);
        Ok(())
    }
}

impl AttributedGraph {

    /** creates a graph with n vertices and the given edges. Edges are not
    checked here (see `builder::validate_graph`). */
    pub fn new(nb_vertices:usize, edges:Vec<(VertexId,VertexId)>) -> Self {
        Self { nb_vertices, edges, attributes: BTreeMap::new() }
    }

    /// adds an edge
    pub fn add_edge(&mut self, u:VertexId, v:VertexId) {
        self.edges.push((u,v));
    }

    /// names of the attribute columns
    pub fn attribute_names(&self) -> impl Iterator<Item=&str> {
        self.attributes.keys().map(|s| s.as_str())
    }

    /// removes an attribute column, returns true if it existed
    pub fn remove_attribute(&mut self, name:&str) -> bool {
        self.attributes.remove(name).is_some()
    }

    /// reads a graph from a JSON file
    pub fn from_json_file(filename:&str) -> Result<Self> {
        let s = fs::read_to_string(filename)?;
        Self::from_json_str(&s)
    }

    /// reads a graph from a JSON string
    pub fn from_json_str(s:&str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// JSON encoding of the graph and its attributes
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// writes the graph (and its attributes) into a JSON file
    pub fn write_json_file(&self, filename:&str) -> Result<()> {
        fs::write(filename, self.to_json_string()?)?;
        Ok(())
    }

    /// print statistics of the graph
    pub fn display_statistics(&self) {
        println!("\t{:>25}{:>10}", "nb vertices:", self.nb_vertices);
        println!("\t{:>25}{:>10}", "nb edges:", self.edges.len());
        for name in self.attribute_names() {
            println!("\t{:>25}{:>10}", "attribute:", name);
        }
    }

    fn check_vertex(&self, v:VertexId) -> Result<()> {
        if v >= self.nb_vertices {
            return Err(ColoringError::VertexOutOfRange { vertex: v, nb_vertices: self.nb_vertices });
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_attribute_creates_column() {
        let mut g = AttributedGraph::new(3, vec![(0,1)]);
        assert!(!g.has_attribute("weight"));
        assert_eq!(g.ensure_attribute("weight", AttrValue::Float(1.)).unwrap(), 3);
        assert_eq!(g.attribute("weight", 2).unwrap(), AttrValue::Float(1.));
        // second call does nothing
        assert_eq!(g.ensure_attribute("weight", AttrValue::Float(2.)).unwrap(), 0);
        assert_eq!(g.attribute("weight", 2).unwrap(), AttrValue::Float(1.));
    }

    #[test]
    fn test_ensure_attribute_fills_unset_entries() {
        let mut g = AttributedGraph::new(3, vec![]);
        g.set_attribute("relevant", 1, AttrValue::Bool(false)).unwrap();
        assert_eq!(g.ensure_attribute("relevant", AttrValue::Bool(true)).unwrap(), 2);
        assert_eq!(g.attribute("relevant", 0).unwrap(), AttrValue::Bool(true));
        assert_eq!(g.attribute("relevant", 1).unwrap(), AttrValue::Bool(false));
    }

    #[test]
    fn test_missing_attribute_and_vertex() {
        let g = AttributedGraph::new(2, vec![]);
        assert!(matches!(g.attribute("color", 0), Err(ColoringError::MissingAttribute(_))));
        assert!(matches!(
            g.attribute("color", 5),
            Err(ColoringError::VertexOutOfRange { vertex: 5, nb_vertices: 2 })
        ));
    }

    #[test]
    fn test_read_json() {
        let g = AttributedGraph::from_json_str(r#"{
            "nb_vertices": 3,
            "edges": [[0,1],[1,2]],
            "attributes": {
                "weight": [1, 2.5, 0.5],
                "color": [null, 2, null],
                "relevant": [true, true, false]
            }
        }"#).unwrap();
        assert_eq!(g.nb_vertices(), 3);
        assert_eq!(g.edges(), &[(0,1),(1,2)]);
        assert_eq!(g.attribute("weight", 0).unwrap().as_f64(), Some(1.));
        assert_eq!(g.attribute("weight", 1).unwrap().as_f64(), Some(2.5));
        assert_eq!(g.attribute("color", 0).unwrap().as_color(), Some(None));
        assert_eq!(g.attribute("color", 1).unwrap().as_color(), Some(Some(2)));
        assert_eq!(g.attribute("relevant", 2).unwrap().as_bool(), Some(false));
        // round trip keeps everything
        let g2 = AttributedGraph::from_json_str(&g.to_json_string().unwrap()).unwrap();
        assert_eq!(g, g2);
    }

    #[test]
    fn test_negative_color_is_not_a_color() {
        assert_eq!(AttrValue::Int(-1).as_color(), None);
        assert_eq!(AttrValue::Float(1.).as_color(), None);
    }
}
