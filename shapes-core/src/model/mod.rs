//! Persisted shapes.
//!
//! Both kinds keep their coordinates as the delimited text they were submitted with; the
//! text is only parsed (see [`crate::geometry::coords`]) when a shape takes part in an
//! intersection test.

pub mod id_list;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::{
    error::ShapeError,
    geometry::{coords::{format_coords, parse_vertices}, r2::R2},
};

/// Identifier assigned by the store on first save.
pub type ShapeId = i32;

/// Anything a [`crate::store::Repo`] can hold.
pub trait Entity: Clone {
    fn id(&self) -> Option<ShapeId>;
    fn with_id(self, id: ShapeId) -> Self;
}

#[derive(Debug, Display, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[display(fmt = "Square({:?}, x: {:?}, y: {:?})", id, x_points, y_points)]
#[serde(rename_all = "camelCase")]
pub struct Square {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub id: Option<ShapeId>,
    pub x_points: String,
    pub y_points: String,
    /// Ids of the polygons this square intersects, in discovery order.
    #[serde(default, with = "id_list")]
    #[tsify(type = "string")]
    pub polygons: Vec<ShapeId>,
}

#[derive(Debug, Display, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[display(fmt = "Polygon({:?}, x: {:?}, y: {:?})", id, x_points, y_points)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub id: Option<ShapeId>,
    pub x_points: String,
    pub y_points: String,
}

impl Square {
    pub fn new(xs: &[i32], ys: &[i32]) -> Self {
        Square {
            id: None,
            x_points: format_coords(xs),
            y_points: format_coords(ys),
            polygons: vec![],
        }
    }

    pub fn vertices(&self) -> Result<Vec<R2<i32>>, ShapeError> {
        parse_vertices(&self.x_points, &self.y_points)
    }
}

impl Polygon {
    pub fn new(xs: &[i32], ys: &[i32]) -> Self {
        Polygon {
            id: None,
            x_points: format_coords(xs),
            y_points: format_coords(ys),
        }
    }

    pub fn vertices(&self) -> Result<Vec<R2<i32>>, ShapeError> {
        parse_vertices(&self.x_points, &self.y_points)
    }
}

impl Entity for Square {
    fn id(&self) -> Option<ShapeId> {
        self.id
    }
    fn with_id(self, id: ShapeId) -> Self {
        Square { id: Some(id), ..self }
    }
}

impl Entity for Polygon {
    fn id(&self) -> Option<ShapeId> {
        self.id
    }
    fn with_id(self, id: ShapeId) -> Self {
        Polygon { id: Some(id), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_json() {
        let square = Square { id: Some(4), polygons: vec![1, 3], ..Square::new(&[0, 10, 10, 0], &[0, 0, 10, 10]) };
        let json = serde_json::to_value(&square).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 4,
                "xPoints": "0,10,10,0",
                "yPoints": "0,0,10,10",
                "polygons": "1,3",
            }),
        );
        let back: Square = serde_json::from_value(json).unwrap();
        assert_eq!(back, square);
    }

    #[test]
    fn test_new_square_json() {
        let square: Square = serde_json::from_str(r#"{"xPoints": "[0,10,10,0]", "yPoints": "[0,0,10,10]"}"#).unwrap();
        assert_eq!(square.id, None);
        assert!(square.polygons.is_empty());
        assert_eq!(serde_json::to_value(&square).unwrap()["polygons"], "");
    }

    #[test]
    fn test_display() {
        let polygon = Polygon::new(&[1, 2, 3], &[4, 5, 6]).with_id(2);
        assert_eq!(polygon.to_string(), r#"Polygon(Some(2), x: "1,2,3", y: "4,5,6")"#);
    }
}
