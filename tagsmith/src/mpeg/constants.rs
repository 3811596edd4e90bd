// [version index][layer index][bitrate index], in kbps
//
// The version index is 0 for MPEG-1, and 1 for MPEG-2 and MPEG-2.5
pub(super) const BITRATES: [[[u32; 16]; 3]; 2] = [
	[
		[
			0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0,
		], // Layer 1
		[
			0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0,
		], // Layer 2
		[
			0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
		], // Layer 3
	],
	[
		[
			0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0,
		], // Layer 1
		[
			0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
		], // Layer 2
		[
			0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
		], // Layer 3
	],
];

// [MpegVersion as usize][sample rate index]
pub(super) const SAMPLE_RATES: [[u32; 3]; 3] = [
	[44100, 48000, 32000], // MPEG-1
	[22050, 24000, 16000], // MPEG-2
	[11025, 12000, 8000],  // MPEG-2.5
];

// [layer index][version index]
pub(super) const SAMPLES: [[u16; 2]; 3] = [
	[384, 384],   // Layer 1
	[1152, 1152], // Layer 2
	[1152, 576],  // Layer 3
];

// [version index][ChannelMode as usize]
pub(super) const SIDE_INFORMATION_SIZES: [[u32; 4]; 2] = [[32, 32, 32, 17], [17, 17, 17, 9]];

// [layer index]
pub(super) const PADDING_SIZES: [u8; 3] = [4, 1, 1];
