use std::marker::PhantomData;

/// A uniform buffer sized for exactly one `T`.
///
/// Uploads are skipped while the bytes equal the last upload, so a scene at
/// rest costs no queue writes per frame.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    last_upload: LastUpload,
    _content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            last_upload: LastUpload::default(),
            _content: PhantomData,
        }
    }

    /// Writes `content` to the buffer. Returns `false` if it was unchanged.
    pub fn write(&mut self, queue: &wgpu::Queue, content: &T) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if !self.last_upload.replace_if_changed(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

#[derive(Debug, Default)]
struct LastUpload(Option<Vec<u8>>);

impl LastUpload {
    fn replace_if_changed(&mut self, bytes: &[u8]) -> bool {
        if self.0.as_deref() == Some(bytes) {
            return false;
        }
        self.0 = Some(bytes.to_vec());
        true
    }
}
