//! embedded-graphics integration, enabled by the `graphics` feature.

use embedded_graphics::pixelcolor::Rgb565 as EgRgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Rgb565;
use crate::driver::St7789;
use crate::interface::Interface;
use crate::Error;

impl<DI: Interface> OriginDimensions for St7789<DI> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

impl<DI: Interface> DrawTarget for St7789<DI> {
    type Color = EgRgb565;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.pixel(point.x, point.y, Rgb565::from_raw(color.into_storage()))?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width,
            area.size.height,
            Rgb565::from_raw(color.into_storage()),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(Rgb565::from_raw(color.into_storage()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::displays::st7789_240x320;
    use crate::testutil::MockInterface;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn rectangles_go_through_the_fill_fast_path() {
        let mut d = st7789_240x320::new(MockInterface::new()).unwrap();
        Rectangle::new(Point::new(10, 10), Size::new(16, 4))
            .into_styled(PrimitiveStyle::with_fill(EgRgb565::RED))
            .draw(&mut d)
            .unwrap();
        let di = d.release();
        assert_eq!(di.data_bytes(), 16 * 4 * 2);
    }

    #[test]
    fn size_follows_the_active_rotation() {
        let mut d = st7789_240x320::new(MockInterface::new()).unwrap();
        assert_eq!(d.size(), Size::new(240, 320));
        d.set_rotation(1).unwrap();
        assert_eq!(d.size(), Size::new(320, 240));
    }
}
