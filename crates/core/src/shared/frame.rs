use ndarray::{ArrayView3, ArrayViewMut3};

/// Order of the colour channels within each pixel.
///
/// Camera backends commonly deliver BGR while detection models expect RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// A single captured frame: contiguous interleaved bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque apart from the channel order tag.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    channel_order: ChannelOrder,
    index: usize,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        channel_order: ChannelOrder,
        index: usize,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            channel_order,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a copy of this frame with its channels in `order`.
    ///
    /// RGB and BGR differ only in the position of the first and third
    /// channel, so conversion is a per-pixel swap. Frames with fewer than
    /// three channels are copied unchanged apart from the tag.
    pub fn to_channel_order(&self, order: ChannelOrder) -> Frame {
        let mut converted = self.clone();
        if order != self.channel_order && self.channels >= 3 {
            for pixel in converted.data.chunks_exact_mut(self.channels as usize) {
                pixel.swap(0, 2);
            }
        }
        converted.channel_order = order;
        converted
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
