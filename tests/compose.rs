use image::{DynamicImage, Rgba, RgbaImage};
use multibg::{
    BackgroundColor, CanvasComposer, FitPlan, ImageFitter, ResizeFilter, ScreenInfo,
    ScreenLayoutProvider, StaticLayout,
};

const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);

fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
}

fn layout(geometries: &[&str]) -> Vec<ScreenInfo> {
    StaticLayout::new(geometries.iter().map(|g| g.parse().unwrap()))
        .query_screens(None)
        .unwrap()
}

#[test]
fn side_by_side_full_hd() {
    let screens = layout(&["1920x1080+0+0", "1920x1080+1920+0"]);
    let images = [solid(800, 600, RED), solid(3000, 1000, GREEN)];

    let composer = CanvasComposer::new(
        ImageFitter::new(ResizeFilter::Triangle),
        BackgroundColor::default(),
    );
    let canvas = composer.compose(&screens, &images).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (3840, 1080));

    let pixels = canvas.pixels();
    assert_eq!(*pixels.get_pixel(0, 0), RED);
    assert_eq!(*pixels.get_pixel(1919, 1079), RED);
    assert_eq!(*pixels.get_pixel(1920, 0), GREEN);
    assert_eq!(*pixels.get_pixel(3839, 1079), GREEN);
}

#[test]
fn double_width_image_yields_center_slice() {
    let screens = layout(&["1024x768+0+0"]);
    let source = RgbaImage::from_fn(2048, 768, |x, y| {
        Rgba([(x / 8) as u8, (y / 4) as u8, (x % 7) as u8, 255])
    });

    let plan = FitPlan::new((2048, 768), (1024, 768)).unwrap();
    assert_eq!(plan.scale, 1.0);
    assert_eq!(plan.resized, (2048, 768));
    assert_eq!(plan.crop, (512, 0));

    let canvas = CanvasComposer::default()
        .compose(&screens, &[DynamicImage::ImageRgba8(source.clone())])
        .unwrap();
    assert_eq!((canvas.width(), canvas.height()), (1024, 768));
    for (x, y) in [(0, 0), (511, 300), (1023, 767)] {
        assert_eq!(canvas.pixels().get_pixel(x, y), source.get_pixel(x + 512, y));
    }
}

#[test]
fn fewer_images_than_screens_leaves_background() {
    let screens = layout(&["640x480+0+0", "640x480+640+0", "800x600+1280+0"]);
    let background: BackgroundColor = "#336699".parse().unwrap();
    let composer = CanvasComposer::new(ImageFitter::new(ResizeFilter::Triangle), background);

    let canvas = composer.compose(&screens, &[solid(100, 100, RED)]).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (2080, 600));

    let pixels = canvas.pixels();
    assert_eq!(*pixels.get_pixel(639, 479), RED);
    assert_eq!(*pixels.get_pixel(640, 0), background.rgba());
    assert_eq!(*pixels.get_pixel(2079, 599), background.rgba());
    // Below the shorter first screen.
    assert_eq!(*pixels.get_pixel(0, 599), background.rgba());
}

#[test]
fn no_images_at_all_is_just_background() {
    let screens = layout(&["320x200+0+0"]);
    let canvas = CanvasComposer::default().compose(&screens, &[]).unwrap();
    assert!(canvas.pixels().pixels().all(|p| *p == BackgroundColor::BLACK.rgba()));
}

#[test]
fn offset_layout_grows_canvas_from_origin() {
    let screens = layout(&["100x50+20+10"]);
    let canvas = CanvasComposer::default()
        .compose(&screens, &[solid(10, 5, GREEN)])
        .unwrap();
    assert_eq!((canvas.width(), canvas.height()), (120, 60));
    assert_eq!(*canvas.pixels().get_pixel(19, 9), BackgroundColor::BLACK.rgba());
    assert_eq!(*canvas.pixels().get_pixel(20, 10), GREEN);
    assert_eq!(*canvas.pixels().get_pixel(119, 59), GREEN);
}

#[test]
fn each_fitted_image_matches_its_screen() {
    let screens = layout(&["1280x1024+0+0", "2560x1440+1280+0", "1080x1920+3840+0"]);
    let fitter = ImageFitter::new(ResizeFilter::Nearest);
    for (screen, image) in screens.iter().zip([
        solid(333, 777, RED),
        solid(4000, 10, GREEN),
        solid(1080, 1920, RED),
    ]) {
        let fitted = fitter.fit(&image, screen.size()).unwrap();
        assert_eq!(fitted.dimensions(), screen.size());
    }
}
