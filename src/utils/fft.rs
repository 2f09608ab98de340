//! In-place inverse real FFT, used to synthesize noise waves from a spectrum.
//!
//! The buffer layout follows the usual packed real format: index `0` holds the
//! DC term, indices `1..n/2` the real (cosine) parts and indices `n - k` the
//! imaginary (sine) parts of bin `k`. After the transform, a unit cosine
//! coefficient in bin `k` becomes `2 * cos(2 * pi * k * i / n)`.

// Based on MIT-licensed code (c) 2018 by John Nesky

#[allow(unused_imports)]
use num_traits::float::Float;

/// Largest supported buffer length.
pub const MAX_FFT_LENGTH: usize = 1 << 16;

fn count_bits(length: usize) -> u32 {
    assert!(
        length.is_power_of_two(),
        "FFT array length must be a power of 2"
    );
    assert!(length >= 4, "FFT array length must be at least 4");
    assert!(
        length <= MAX_FFT_LENGTH,
        "FFT array length must not be greater than 2^16"
    );

    length.trailing_zeros()
}

fn reverse_index_bits(array: &mut [f32]) {
    let final_shift = 16 - count_bits(array.len());

    for i in 0..array.len() {
        let mut j = ((i & 0xaaaa) >> 1) | ((i & 0x5555) << 1);
        j = ((j & 0xcccc) >> 2) | ((j & 0x3333) << 2);
        j = ((j & 0xf0f0) >> 4) | ((j & 0x0f0f) << 4);
        j = (((j >> 8) & 0xff) | ((j & 0xff) << 8)) >> final_shift;
        if j > i {
            array.swap(i, j);
        }
    }
}

/// Transforms a packed spectrum into a real signal, in place.
///
/// Panics if the length is not a power of two in `4..=65536`.
pub fn inverse_real_fft(array: &mut [f32]) {
    let full_length = array.len();
    let total_passes = count_bits(full_length);

    // All but the two last passes, in reverse order.
    for pass in (2..total_passes).rev() {
        let sub_stride = 1usize << pass;
        let mid_sub_stride = sub_stride >> 1;
        let stride = sub_stride << 1;
        let radians_increment = core::f64::consts::PI * 2.0 / stride as f64;
        let cos_increment = radians_increment.cos();
        let sin_increment = radians_increment.sin();
        let oscillator_multiplier = 2.0 * cos_increment;

        for start_index in (0..full_length).step_by(stride) {
            let start_index_a = start_index;
            let mid_index_a = start_index_a + mid_sub_stride;
            let start_index_b = start_index_a + sub_stride;
            let mid_index_b = start_index_b + mid_sub_stride;
            let stop_index = start_index_b + sub_stride;

            let real_start_a = array[start_index_a];
            let imag_start_b = array[start_index_b];
            array[start_index_a] = real_start_a + imag_start_b;
            array[mid_index_a] *= 2.0;
            array[start_index_b] = real_start_a - imag_start_b;
            array[mid_index_b] *= 2.0;

            let mut c = cos_increment;
            let mut s = -sin_increment;
            let mut c_previous = 1.0;
            let mut s_previous = 0.0;

            for index in 1..mid_sub_stride {
                let index_a0 = start_index_a + index;
                let index_a1 = start_index_b - index;
                let index_b0 = start_index_b + index;
                let index_b1 = stop_index - index;

                let real0 = array[index_a0];
                let real1 = array[index_a1];
                let imag0 = array[index_b0];
                let imag1 = array[index_b1];

                let temp_a = (real0 - real1) as f64;
                let temp_b = (imag0 + imag1) as f64;
                array[index_a0] = real0 + real1;
                array[index_a1] = imag1 - imag0;
                array[index_b0] = (temp_a * c - temp_b * s) as f32;
                array[index_b1] = (temp_b * c + temp_a * s) as f32;

                // Rotate by the increment with the same recurrence as a sine oscillator.
                let c_next = oscillator_multiplier * c - c_previous;
                let s_next = oscillator_multiplier * s - s_previous;
                c_previous = c;
                s_previous = s;
                c = c_next;
                s = s_next;
            }
        }
    }

    // Passes 0 and 1 merged.
    for index in (0..full_length).step_by(4) {
        let real0 = array[index];
        let real1 = array[index + 1] * 2.0;
        let imag2 = array[index + 2];
        let imag3 = array[index + 3] * 2.0;
        let temp_a = real0 + imag2;
        let temp_b = real0 - imag2;
        array[index] = temp_a + real1;
        array[index + 1] = temp_a - real1;
        array[index + 2] = temp_b + imag3;
        array[index + 3] = temp_b - imag3;
    }

    reverse_index_bits(array);
}
