use image::{GrayImage, Luma};
use plotkit_camtools::{CamToolError, FrameSource, ImageFrameSource, TextFrameSource};
use tempfile::tempdir;

#[test]
fn test_text_frame_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frames.txt");
    std::fs::write(&path, "; two layers\n.##.\n#..#\n\n0110\n").unwrap();

    let frames = TextFrameSource::new(&path).frames().unwrap();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].to_string(), "0110\n1001\n");
    assert_eq!(frames[1].to_string(), "0110\n");
}

#[test]
fn test_missing_text_file() {
    let dir = tempdir().unwrap();
    let err = TextFrameSource::new(dir.path().join("absent.txt"))
        .frames()
        .unwrap_err();
    assert!(matches!(err, CamToolError::LoadError(_)));
}

#[test]
fn test_image_frames_in_order() {
    let dir = tempdir().unwrap();

    let mut first = GrayImage::from_pixel(3, 2, Luma([255]));
    first.put_pixel(0, 0, Luma([0]));
    let first_path = dir.path().join("a.png");
    first.save(&first_path).unwrap();

    let mut second = GrayImage::from_pixel(3, 2, Luma([255]));
    second.put_pixel(2, 1, Luma([10]));
    let second_path = dir.path().join("b.png");
    second.save(&second_path).unwrap();

    let frames = ImageFrameSource::new(vec![first_path, second_path])
        .frames()
        .unwrap();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].to_string(), "100\n000\n");
    assert_eq!(frames[1].to_string(), "000\n001\n");
}

#[test]
fn test_unreadable_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let err = ImageFrameSource::new(vec![path]).frames().unwrap_err();
    assert!(matches!(err, CamToolError::ImageError(_)));
}
