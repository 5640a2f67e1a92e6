//! In-memory figure: a set of axes that record what is drawn on them.
//!
//! `Figure` implements both collaborator traits, so it can be handed straight
//! to [`crate::cline`] and later exported with [`crate::export`].

use crate::args::AxesId;
use crate::config::RenderConfig;
use crate::palette::Palette;
use crate::resolve::Point3;
use crate::style::ResolvedStyle;
use crate::surface::{Appearance, ColorbarWidget, DrawingSurface, View};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FigureError {
    #[error("axes {0} does not exist")]
    UnknownAxes(AxesId),

    #[error("drawable {0} is not on axes {1}")]
    UnknownDrawable(DrawableId, AxesId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DrawableId(pub u64);

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorbarId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line { from: Point3, to: Point3 },
    Point { at: Point3 },
}

/// One recorded drawable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: DrawableId,
    pub primitive: Primitive,
    pub appearance: Appearance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colorbar {
    pub id: ColorbarId,
    pub palette: Option<Palette>,
    pub range: (f64, f64),
    pub visible: bool,
}

/// Recorded state of one set of axes.
#[derive(Debug, Clone, Serialize)]
pub struct Axes {
    items: Vec<Item>,
    hold: bool,
    view: View,
    colorbar: Option<Colorbar>,
}

impl Axes {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            hold: false,
            view: View::default(),
            colorbar: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    fn colorbar_mut(&mut self) -> &mut Colorbar {
        self.colorbar.get_or_insert_with(|| Colorbar {
            id: ColorbarId(0),
            palette: None,
            range: (0.0, 1.0),
            visible: false,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    axes: BTreeMap<AxesId, Axes>,
    current: Option<AxesId>,
    defaults: ResolvedStyle,
    next_id: u64,
}

impl Default for Figure {
    fn default() -> Self {
        Self::with_defaults(ResolvedStyle::default())
    }
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Figure whose drawables fall back to `defaults` for unset style fields.
    pub fn with_defaults(defaults: ResolvedStyle) -> Self {
        Self {
            axes: BTreeMap::new(),
            current: None,
            defaults,
            next_id: 1,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::with_defaults(config.default_style())
    }

    /// Create a new set of axes and make it current.
    pub fn add_axes(&mut self) -> AxesId {
        let id = AxesId(self.axes.keys().next_back().map_or(1, |last| last.0 + 1));
        self.axes.insert(id, Axes::new());
        self.current = Some(id);
        id
    }

    pub fn set_current(&mut self, id: AxesId) -> Result<(), FigureError> {
        if !self.axes.contains_key(&id) {
            return Err(FigureError::UnknownAxes(id));
        }
        self.current = Some(id);
        Ok(())
    }

    pub fn axes(&self, id: AxesId) -> Option<&Axes> {
        self.axes.get(&id)
    }

    pub fn axes_ids(&self) -> impl Iterator<Item = AxesId> + '_ {
        self.axes.keys().copied()
    }

    /// Look up a drawable by handle on any axes.
    pub fn item(&self, id: DrawableId) -> Option<&Item> {
        self.axes
            .values()
            .flat_map(|a| a.items.iter())
            .find(|item| item.id == id)
    }

    fn axes_mut(&mut self, id: AxesId) -> Result<&mut Axes, FigureError> {
        self.axes.get_mut(&id).ok_or(FigureError::UnknownAxes(id))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(
        &mut self,
        axes: AxesId,
        primitive: Primitive,
        appearance: &Appearance,
    ) -> Result<DrawableId, FigureError> {
        let id = DrawableId(self.next_id());
        let target = self.axes_mut(axes)?;
        if !target.hold {
            target.items.clear();
        }
        target.items.push(Item {
            id,
            primitive,
            appearance: appearance.clone(),
        });
        Ok(id)
    }
}

impl DrawingSurface for Figure {
    type Handle = DrawableId;
    type Error = FigureError;

    fn current_axes(&mut self) -> AxesId {
        match self.current {
            Some(id) => id,
            None => self.add_axes(),
        }
    }

    fn default_style(&self, _axes: AxesId) -> ResolvedStyle {
        self.defaults.clone()
    }

    fn draw_line(
        &mut self,
        axes: AxesId,
        from: Point3,
        to: Point3,
        appearance: &Appearance,
    ) -> Result<DrawableId, FigureError> {
        self.push(axes, Primitive::Line { from, to }, appearance)
    }

    fn draw_point(
        &mut self,
        axes: AxesId,
        at: Point3,
        appearance: &Appearance,
    ) -> Result<DrawableId, FigureError> {
        self.push(axes, Primitive::Point { at }, appearance)
    }

    fn hold(&self, axes: AxesId) -> bool {
        self.axes.get(&axes).is_some_and(|a| a.hold)
    }

    fn set_hold(&mut self, axes: AxesId, hold: bool) {
        if let Some(a) = self.axes.get_mut(&axes) {
            a.hold = hold;
        }
    }

    fn clear(&mut self, axes: AxesId) -> Result<(), FigureError> {
        let target = self.axes_mut(axes)?;
        target.items.clear();
        target.colorbar = None;
        target.view = View::default();
        Ok(())
    }

    fn delete_drawables(
        &mut self,
        axes: AxesId,
        handles: &[DrawableId],
    ) -> Result<(), FigureError> {
        let target = self.axes_mut(axes)?;
        if let Some(missing) = handles
            .iter()
            .find(|h| !target.items.iter().any(|item| item.id == **h))
        {
            return Err(FigureError::UnknownDrawable(*missing, axes));
        }
        target.items.retain(|item| !handles.contains(&item.id));
        Ok(())
    }

    fn set_view(&mut self, axes: AxesId, view: View) -> Result<(), FigureError> {
        self.axes_mut(axes)?.view = view;
        Ok(())
    }
}

impl ColorbarWidget for Figure {
    type ColorbarHandle = ColorbarId;

    fn set_palette(&mut self, axes: AxesId, palette: &Palette) -> Result<(), FigureError> {
        self.axes_mut(axes)?.colorbar_mut().palette = Some(palette.clone());
        Ok(())
    }

    fn set_color_range(&mut self, axes: AxesId, min: f64, max: f64) -> Result<(), FigureError> {
        self.axes_mut(axes)?.colorbar_mut().range = (min, max);
        Ok(())
    }

    fn show_colorbar(&mut self, axes: AxesId) -> Result<ColorbarId, FigureError> {
        let id = ColorbarId(self.next_id());
        let bar = self.axes_mut(axes)?.colorbar_mut();
        bar.id = id;
        bar.visible = true;
        Ok(id)
    }

    fn remove_colorbar(&mut self, axes: AxesId) -> Result<(), FigureError> {
        self.axes_mut(axes)?.colorbar = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;

    fn p(x: f64, y: f64) -> Point3 {
        Point3 { x, y, z: 0.0 }
    }

    fn look() -> Appearance {
        Appearance::new(Rgb::new(0.0, 0.0, 0.0), &ResolvedStyle::default(), false)
    }

    #[test]
    fn current_axes_is_created_on_demand() {
        let mut fig = Figure::new();
        let a = fig.current_axes();
        assert_eq!(fig.current_axes(), a);
        let b = fig.add_axes();
        assert_ne!(a, b);
        assert_eq!(fig.current_axes(), b);
        assert!(fig.set_current(AxesId(99)).is_err());
    }

    #[test]
    fn hold_off_replaces_content() {
        let mut fig = Figure::new();
        let ax = fig.add_axes();
        fig.draw_line(ax, p(0.0, 0.0), p(1.0, 1.0), &look()).unwrap();
        fig.draw_line(ax, p(1.0, 1.0), p(2.0, 0.0), &look()).unwrap();
        assert_eq!(fig.axes(ax).unwrap().items().len(), 1);

        fig.set_hold(ax, true);
        fig.draw_point(ax, p(3.0, 3.0), &look()).unwrap();
        assert_eq!(fig.axes(ax).unwrap().items().len(), 2);
    }

    #[test]
    fn delete_checks_handles() {
        let mut fig = Figure::new();
        let ax = fig.add_axes();
        fig.set_hold(ax, true);
        let a = fig.draw_point(ax, p(0.0, 0.0), &look()).unwrap();
        let b = fig.draw_point(ax, p(1.0, 0.0), &look()).unwrap();
        fig.delete_drawables(ax, &[a]).unwrap();
        assert_eq!(fig.axes(ax).unwrap().items()[0].id, b);
        assert_eq!(
            fig.delete_drawables(ax, &[a]),
            Err(FigureError::UnknownDrawable(a, ax))
        );
    }

    #[test]
    fn drawing_on_missing_axes_fails() {
        let mut fig = Figure::new();
        let err = fig.draw_point(AxesId(4), p(0.0, 0.0), &look()).unwrap_err();
        assert_eq!(err.to_string(), "axes #4 does not exist");
    }

    #[test]
    fn colorbar_records_palette_and_range() {
        let mut fig = Figure::new();
        let ax = fig.add_axes();
        let palette = crate::palette::BuiltinPalettes::with_rows(8);
        let palette = crate::palette::PaletteRegistry::resolve(&palette, "hot").unwrap();
        fig.set_palette(ax, &palette).unwrap();
        fig.set_color_range(ax, -1.0, 4.0).unwrap();
        let id = fig.show_colorbar(ax).unwrap();
        let bar = fig.axes(ax).unwrap().colorbar().unwrap();
        assert_eq!(bar.id, id);
        assert!(bar.visible);
        assert_eq!(bar.range, (-1.0, 4.0));
        assert_eq!(bar.palette.as_ref().map(Palette::len), Some(8));
        fig.remove_colorbar(ax).unwrap();
        assert!(fig.axes(ax).unwrap().colorbar().is_none());
    }
}
