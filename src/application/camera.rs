/// Camera maps world cell coordinates to screen pixels and back.
///
/// Convention: `screen = world * cell_px + offset`, so `offset` is the
/// screen position of the world origin and `cell_px` (the zoom) is the
/// rendered size of one cell in pixels.
pub struct Camera {
    pub offset_x: f32,
    pub offset_y: f32,
    cell_px: f32,
    min_cell_px: f32,
    max_cell_px: f32,
    viewport_w: f32,
    viewport_h: f32,
}

impl Camera {
    pub fn new(cell_px: f32, min_cell_px: f32, max_cell_px: f32) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            cell_px: cell_px.clamp(min_cell_px, max_cell_px),
            min_cell_px,
            max_cell_px,
            viewport_w: 0.0,
            viewport_h: 0.0,
        }
    }

    /// Rendered cell size in pixels (the zoom level)
    pub const fn cell_px(&self) -> f32 {
        self.cell_px
    }

    /// Record the current window size; `center` and culling use it
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_w = width;
        self.viewport_h = height;
    }

    /// Convert grid coordinates to the screen position of the cell's
    /// top-left corner
    pub fn world_to_screen(&self, x: i32, y: i32) -> (f32, f32) {
        (
            x as f32 * self.cell_px + self.offset_x,
            y as f32 * self.cell_px + self.offset_y,
        )
    }

    /// Convert a screen pixel to the grid cell covering it. Exact
    /// inverse of `world_to_screen` for integer cells.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (i32, i32) {
        (
            ((sx - self.offset_x) / self.cell_px).floor() as i32,
            ((sy - self.offset_y) / self.cell_px).floor() as i32,
        )
    }

    /// Pan by a screen-space delta; unconstrained
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Scale the zoom by `factor`, keeping the world point under the
    /// focal screen point visually fixed. The offset is rescaled about
    /// the focal point by the same ratio the zoom actually changed by,
    /// so clamping cannot drift the view.
    pub fn zoom_at(&mut self, focal: (f32, f32), factor: f32) {
        let new_cell_px = (self.cell_px * factor).clamp(self.min_cell_px, self.max_cell_px);
        let applied = new_cell_px / self.cell_px;
        self.offset_x = focal.0 + (self.offset_x - focal.0) * applied;
        self.offset_y = focal.1 + (self.offset_y - focal.1) * applied;
        self.cell_px = new_cell_px;
    }

    /// Reset the offset so a grid of the given dimensions sits centered
    /// in the viewport at the current zoom
    pub fn center(&mut self, grid_width: usize, grid_height: usize) {
        self.offset_x = self.viewport_w / 2.0 - grid_width as f32 / 2.0 * self.cell_px;
        self.offset_y = self.viewport_h / 2.0 - grid_height as f32 / 2.0 * self.cell_px;
    }

    /// Inclusive-exclusive range of world cells overlapping the
    /// viewport, for render culling
    pub fn visible_bounds(&self) -> (i32, i32, i32, i32) {
        let (min_x, min_y) = self.screen_to_world(0.0, 0.0);
        let (max_x, max_y) = self.screen_to_world(self.viewport_w, self.viewport_h);
        (min_x, min_y, max_x + 1, max_y + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_screen_round_trip() {
        let mut camera = Camera::new(12.0, 1.0, 64.0);
        camera.pan(-37.5, 101.25);
        for &(x, y) in &[(0, 0), (5, 9), (-4, 17), (123, -56)] {
            let (sx, sy) = camera.world_to_screen(x, y);
            assert_eq!(camera.screen_to_world(sx, sy), (x, y));
        }
    }

    #[test]
    fn test_screen_to_world_floors_within_cell() {
        let camera = Camera::new(10.0, 1.0, 64.0);
        assert_eq!(camera.screen_to_world(9.9, 9.9), (0, 0));
        assert_eq!(camera.screen_to_world(10.0, 0.0), (1, 0));
        assert_eq!(camera.screen_to_world(-0.1, 0.0), (-1, 0));
    }

    #[test]
    fn test_zoom_at_keeps_focal_point_fixed() {
        let mut camera = Camera::new(8.0, 1.0, 64.0);
        camera.pan(33.0, -12.0);
        let focal = (400.0, 300.0);

        let world_before = {
            let (fx, fy) = focal;
            (
                (fx - camera.offset_x) / camera.cell_px(),
                (fy - camera.offset_y) / camera.cell_px(),
            )
        };
        camera.zoom_at(focal, 2.0);
        let world_after = (
            (focal.0 - camera.offset_x) / camera.cell_px(),
            (focal.1 - camera.offset_y) / camera.cell_px(),
        );

        assert!((world_before.0 - world_after.0).abs() < 1e-3);
        assert!((world_before.1 - world_after.1).abs() < 1e-3);
        assert_eq!(camera.cell_px(), 16.0);
    }

    #[test]
    fn test_zoom_clamped_to_bounds() {
        let mut camera = Camera::new(8.0, 2.0, 16.0);
        camera.zoom_at((0.0, 0.0), 100.0);
        assert_eq!(camera.cell_px(), 16.0);
        camera.zoom_at((0.0, 0.0), 0.001);
        assert_eq!(camera.cell_px(), 2.0);
    }

    #[test]
    fn test_clamped_zoom_does_not_move_view() {
        let mut camera = Camera::new(16.0, 2.0, 16.0);
        camera.pan(50.0, 60.0);
        let before = (camera.offset_x, camera.offset_y);
        // Already at max zoom: a zoom-in must be a no-op for the offset too
        camera.zoom_at((200.0, 100.0), 2.0);
        assert_eq!((camera.offset_x, camera.offset_y), before);
    }

    #[test]
    fn test_center_puts_grid_middle_at_viewport_middle() {
        let mut camera = Camera::new(10.0, 1.0, 64.0);
        camera.set_viewport(800.0, 600.0);
        camera.center(40, 30);
        let (sx, sy) = camera.world_to_screen(20, 15);
        assert_eq!((sx, sy), (400.0, 300.0));
    }

    #[test]
    fn test_visible_bounds_cover_viewport() {
        let mut camera = Camera::new(10.0, 1.0, 64.0);
        camera.set_viewport(100.0, 50.0);
        let (min_x, min_y, max_x, max_y) = camera.visible_bounds();
        assert!(min_x <= 0 && min_y <= 0);
        assert!(max_x >= 10 && max_y >= 5);
    }
}
