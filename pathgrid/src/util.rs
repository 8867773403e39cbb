use image::{DynamicImage, GenericImageView};

use crate::GridMap;

/// One cell per pixel, dark pixels become barriers
pub fn parse_img(img: &DynamicImage) -> Result<GridMap, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!("Image has no pixels"));
    }

    let mut map = GridMap::with_size(height, width, 1);

    for point in map.points().collect::<Vec<_>>() {
        let p = img.get_pixel(point.col as u32, point.row as u32);

        if p.0[0] < 128 {
            map.set_barrier(point);
        }
    }

    Ok(map)
}
