use crate::abi::*;

pub type Point = glam::Vec2;
pub type PointU = glam::UVec2;
pub type Vector = glam::Vec2;
pub type Matrix3x2 = glam::Affine2;
pub type Matrix4x4 = glam::Mat4;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    #[inline]
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

/// An edge-coordinate rectangle, matching the native `left, top, right, bottom` layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub right: T,
    pub bottom: T,
}

pub type RectF = Rect<f32>;
pub type RectL = Rect<i32>;

impl<T> Rect<T> {
    #[inline]
    pub fn new(left: T, top: T, right: T, bottom: T) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl<T> Rect<T>
where
    T: Copy + std::ops::Sub<Output = T>,
{
    #[inline]
    pub fn size(&self) -> Size<T> {
        Size::new(self.right - self.left, self.bottom - self.top)
    }
}

impl RectL {
    /// The largest rectangle the effect pipeline understands.
    pub const INFINITE: Self = Self {
        left: i32::MIN,
        top: i32::MIN,
        right: i32::MAX,
        bottom: i32::MAX,
    };
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Triangle(pub Point, pub Point, pub Point);

impl From<D2D_POINT_2F> for Point {
    #[inline]
    fn from(src: D2D_POINT_2F) -> Self {
        Point::new(src.x, src.y)
    }
}

impl From<Point> for D2D_POINT_2F {
    #[inline]
    fn from(src: Point) -> Self {
        Self { x: src.x, y: src.y }
    }
}

impl From<D2D_POINT_2U> for PointU {
    #[inline]
    fn from(src: D2D_POINT_2U) -> Self {
        PointU::new(src.x, src.y)
    }
}

impl From<D2D_SIZE_F> for Size<f32> {
    #[inline]
    fn from(src: D2D_SIZE_F) -> Self {
        Self {
            width: src.width,
            height: src.height,
        }
    }
}

impl From<D2D_RECT_F> for RectF {
    #[inline]
    fn from(src: D2D_RECT_F) -> Self {
        Self {
            left: src.left,
            top: src.top,
            right: src.right,
            bottom: src.bottom,
        }
    }
}

impl From<RectF> for D2D_RECT_F {
    #[inline]
    fn from(src: RectF) -> Self {
        Self {
            left: src.left,
            top: src.top,
            right: src.right,
            bottom: src.bottom,
        }
    }
}

impl From<D2D_RECT_L> for RectL {
    #[inline]
    fn from(src: D2D_RECT_L) -> Self {
        Self {
            left: src.left,
            top: src.top,
            right: src.right,
            bottom: src.bottom,
        }
    }
}

impl From<RectL> for D2D_RECT_L {
    #[inline]
    fn from(src: RectL) -> Self {
        Self {
            left: src.left,
            top: src.top,
            right: src.right,
            bottom: src.bottom,
        }
    }
}

impl From<D2D1_COLOR_F> for Rgba {
    #[inline]
    fn from(src: D2D1_COLOR_F) -> Self {
        Self {
            r: src.r,
            g: src.g,
            b: src.b,
            a: src.a,
        }
    }
}

impl From<D2D1_TRIANGLE> for Triangle {
    #[inline]
    fn from(src: D2D1_TRIANGLE) -> Self {
        Self(src.point1.into(), src.point2.into(), src.point3.into())
    }
}

impl From<Triangle> for D2D1_TRIANGLE {
    #[inline]
    fn from(src: Triangle) -> Self {
        Self {
            point1: src.0.into(),
            point2: src.1.into(),
            point3: src.2.into(),
        }
    }
}

// The native matrices use row vectors, so each native row is a glam column.

impl From<D2D_MATRIX_3X2_F> for Matrix3x2 {
    #[inline]
    fn from(src: D2D_MATRIX_3X2_F) -> Self {
        Matrix3x2::from_cols_array(&[src.M11, src.M12, src.M21, src.M22, src.M31, src.M32])
    }
}

impl From<Matrix3x2> for D2D_MATRIX_3X2_F {
    #[inline]
    fn from(src: Matrix3x2) -> Self {
        let [m11, m12, m21, m22, m31, m32] = src.to_cols_array();
        Self {
            M11: m11,
            M12: m12,
            M21: m21,
            M22: m22,
            M31: m31,
            M32: m32,
        }
    }
}

impl From<D2D_MATRIX_4X4_F> for Matrix4x4 {
    #[inline]
    fn from(src: D2D_MATRIX_4X4_F) -> Self {
        Matrix4x4::from_cols_array_2d(&src.m)
    }
}

impl From<Matrix4x4> for D2D_MATRIX_4X4_F {
    #[inline]
    fn from(src: Matrix4x4) -> Self {
        Self {
            m: src.to_cols_array_2d(),
        }
    }
}
